//! CSV file market-data source.
//!
//! Expects `date,open,high,low,close,volume` rows under a header. `days`
//! caps the result to the most recent bars rather than a wall-clock window,
//! so files holding older history stay usable.

use crate::domain::bar::PriceBar;
use crate::domain::error::StockcastError;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn get_column<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'a str, StockcastError> {
    record.get(index).ok_or_else(|| StockcastError::UpstreamData {
        reason: format!("missing {name} column"),
    })
}

fn parse_price(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, StockcastError> {
    get_column(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| StockcastError::UpstreamData {
            reason: format!("invalid {name} value: {e}"),
        })
}

impl MarketDataPort for CsvAdapter {
    fn fetch_daily(&self, symbol: &str, days: u32) -> Result<Vec<PriceBar>, StockcastError> {
        let content = fs::read_to_string(&self.path).map_err(|e| StockcastError::UpstreamData {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StockcastError::UpstreamData {
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = get_column(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                StockcastError::UpstreamData {
                    reason: format!("invalid date format: {e}"),
                }
            })?;

            let volume: i64 = get_column(&record, 5, "volume")?
                .trim()
                .parse()
                .map_err(|e| StockcastError::UpstreamData {
                    reason: format!("invalid volume value: {e}"),
                })?;

            bars.push(PriceBar {
                symbol: symbol.to_string(),
                date,
                open: parse_price(&record, 1, "open")?,
                high: parse_price(&record, 2, "high")?,
                low: parse_price(&record, 3, "low")?,
                close: parse_price(&record, 4, "close")?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        if bars.len() > days as usize {
            let excess = bars.len() - days as usize;
            bars.drain(..excess);
        }

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    const SAMPLE: &str = "\
date,open,high,low,close,volume
2024-01-04,103.0,105.0,102.0,104.0,3000
2024-01-02,100.0,102.0,99.0,101.0,1000
2024-01-03,101.0,103.0,100.0,102.0,2000
";

    #[test]
    fn reads_and_sorts_ascending() {
        let file = write_csv(SAMPLE);
        let adapter = CsvAdapter::new(file.path().to_path_buf());

        let bars = adapter.fetch_daily("VUKE.L", 365).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(bars[0].symbol, "VUKE.L");
        assert_eq!(bars[1].close, 102.0);
        assert_eq!(bars[2].volume, 3000);
    }

    #[test]
    fn days_caps_to_most_recent() {
        let file = write_csv(SAMPLE);
        let adapter = CsvAdapter::new(file.path().to_path_buf());

        let bars = adapter.fetch_daily("VUKE.L", 2).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        let adapter = CsvAdapter::new(PathBuf::from("/nonexistent/bars.csv"));
        assert!(matches!(
            adapter.fetch_daily("VUKE.L", 10),
            Err(StockcastError::UpstreamData { .. })
        ));
    }

    #[test]
    fn bad_price_value_is_an_error() {
        let file = write_csv("date,open,high,low,close,volume\n2024-01-02,abc,102.0,99.0,101.0,1000\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());

        match adapter.fetch_daily("VUKE.L", 10) {
            Err(StockcastError::UpstreamData { reason }) => {
                assert!(reason.contains("open"));
            }
            other => panic!("expected UpstreamData, got: {other:?}"),
        }
    }

    #[test]
    fn bad_date_is_an_error() {
        let file = write_csv("date,open,high,low,close,volume\n02/01/2024,100.0,102.0,99.0,101.0,1000\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());

        assert!(matches!(
            adapter.fetch_daily("VUKE.L", 10),
            Err(StockcastError::UpstreamData { .. })
        ));
    }

    #[test]
    fn short_row_is_an_error() {
        let file = write_csv("date,open,high,low,close,volume\n2024-01-02,100.0\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());

        assert!(adapter.fetch_daily("VUKE.L", 10).is_err());
    }

    #[test]
    fn header_only_yields_no_bars() {
        let file = write_csv("date,open,high,low,close,volume\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());

        assert!(adapter.fetch_daily("VUKE.L", 10).unwrap().is_empty());
    }
}
