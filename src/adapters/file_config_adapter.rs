//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[sqlite]
path = prices.db

[fetch]
symbol = VUKE.L
days = 365

[report]
format = text
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("sqlite", "path"),
            Some("prices.db".to_string())
        );
        assert_eq!(
            adapter.get_string("fetch", "symbol"),
            Some("VUKE.L".to_string())
        );
        assert_eq!(adapter.get_int("fetch", "days", 0), 365);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[fetch]\nsymbol = VUKE.L\n").unwrap();
        assert_eq!(adapter.get_string("fetch", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing_or_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[fetch]\ndays = soon\n").unwrap();
        assert_eq!(adapter.get_int("fetch", "days", 42), 42);
        assert_eq!(adapter.get_int("fetch", "missing", 7), 7);
    }

    #[test]
    fn get_double_returns_value_or_default() {
        let adapter =
            FileConfigAdapter::from_string("[fetch]\nmin_price = 1.5\nbad = x\n").unwrap();
        assert_eq!(adapter.get_double("fetch", "min_price", 0.0), 1.5);
        assert_eq!(adapter.get_double("fetch", "bad", 9.9), 9.9);
        assert_eq!(adapter.get_double("fetch", "missing", 9.9), 9.9);
    }

    #[test]
    fn get_bool_parses_common_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[a]\nx = true\ny = no\nz = 1\n").unwrap();
        assert!(adapter.get_bool("a", "x", false));
        assert!(!adapter.get_bool("a", "y", true));
        assert!(adapter.get_bool("a", "z", false));
        assert!(adapter.get_bool("a", "missing", true));
    }

    #[test]
    fn from_file_reads_config() {
        let content = "[report]\ntemplate_path = /path/to/report.txt\n";
        let file = create_temp_config(content);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "template_path"),
            Some("/path/to/report.txt".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }

    #[test]
    fn handles_all_config_sections() {
        let content = r#"
[sqlite]
path = stockcast.db
pool_size = 2

[postgres]
connection_string = host=localhost dbname=stockcast

[fetch]
symbol = VUKE.L
days = 180

[yahoo]
base_url = http://localhost:9999

[report]
format = json
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();

        assert_eq!(adapter.get_int("sqlite", "pool_size", 4), 2);
        assert_eq!(
            adapter.get_string("postgres", "connection_string"),
            Some("host=localhost dbname=stockcast".to_string())
        );
        assert_eq!(adapter.get_int("fetch", "days", 365), 180);
        assert_eq!(
            adapter.get_string("yahoo", "base_url"),
            Some("http://localhost:9999".to_string())
        );
        assert_eq!(
            adapter.get_string("report", "format"),
            Some("json".to_string())
        );
    }
}
