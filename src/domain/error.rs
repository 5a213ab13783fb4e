//! Domain error types.

/// Top-level error type for stockcast.
#[derive(Debug, thiserror::Error)]
pub enum StockcastError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("fetch failed: {reason}")]
    Fetch { reason: String },

    #[error("bad upstream data: {reason}")]
    UpstreamData { reason: String },

    #[error("price series is empty")]
    EmptySeries,

    #[error("no stored data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockcastError> for std::process::ExitCode {
    fn from(err: &StockcastError) -> Self {
        let code: u8 = match err {
            StockcastError::Io(_) => 1,
            StockcastError::ConfigParse { .. }
            | StockcastError::ConfigMissing { .. }
            | StockcastError::ConfigInvalid { .. } => 2,
            StockcastError::Database { .. } | StockcastError::DatabaseQuery { .. } => 3,
            StockcastError::Fetch { .. } | StockcastError::UpstreamData { .. } => 4,
            StockcastError::NoData { .. } | StockcastError::EmptySeries => 5,
        };
        std::process::ExitCode::from(code)
    }
}
