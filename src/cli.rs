//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReportAdapter;
use crate::adapters::text_report::TextReportAdapter;
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::bar::PriceBar;
use crate::domain::error::StockcastError;
use crate::domain::forecast;
use crate::domain::statistics;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::report_port::{ReportContext, ReportPort};
use crate::ports::store_port::StorePort;

const DEFAULT_SYMBOL: &str = "VUKE.L";
const DEFAULT_FETCH_DAYS: u32 = 365;

#[derive(Parser, Debug)]
#[command(name = "stockcast", about = "Daily price history store and next-day forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch daily bars from the market-data provider and store them
    Fetch {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        days: Option<u32>,
    },
    /// Import daily bars from a CSV file
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        days: Option<u32>,
    },
    /// Predict the next trading day's closing price
    Predict {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        format: Option<String>,
    },
    /// Print descriptive statistics for the stored series
    Stats {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the stored data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols present in the store
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Fetch {
            config,
            symbol,
            days,
        } => run_fetch(&config, symbol.as_deref(), days),
        Command::Import {
            config,
            file,
            symbol,
            days,
        } => run_import(&config, &file, symbol.as_deref(), days),
        Command::Predict {
            config,
            symbol,
            limit,
            output,
            format,
        } => run_predict(
            &config,
            symbol.as_deref(),
            limit,
            output.as_deref(),
            format.as_deref(),
        ),
        Command::Stats {
            config,
            symbol,
            limit,
        } => run_stats(&config, symbol.as_deref(), limit),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StockcastError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// CLI override beats `[fetch] symbol`; the original tracker's instrument is
/// the fallback.
pub fn resolve_symbol(symbol_override: Option<&str>, config: &dyn ConfigPort) -> String {
    if let Some(s) = symbol_override {
        return s.trim().to_uppercase();
    }

    if let Some(s) = config.get_string("fetch", "symbol") {
        let s = s.trim().to_uppercase();
        if !s.is_empty() {
            return s;
        }
    }

    DEFAULT_SYMBOL.to_string()
}

pub fn resolve_days(days_override: Option<u32>, config: &dyn ConfigPort) -> u32 {
    if let Some(d) = days_override {
        return d;
    }

    let configured = config.get_int("fetch", "days", i64::from(DEFAULT_FETCH_DAYS));
    u32::try_from(configured).unwrap_or(DEFAULT_FETCH_DAYS)
}

pub fn open_store(config: &dyn ConfigPort) -> Result<Box<dyn StorePort>, StockcastError> {
    #[cfg(feature = "postgres")]
    {
        use crate::adapters::postgres_adapter::PostgresAdapter;

        if config.get_string("postgres", "connection_string").is_some()
            || config.get_string("database", "conninfo").is_some()
        {
            let adapter = PostgresAdapter::from_config(config)?;
            adapter.initialize_schema()?;
            return Ok(Box::new(adapter));
        }
    }

    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;

        let adapter = SqliteAdapter::from_config(config)?;
        adapter.initialize_schema()?;
        Ok(Box::new(adapter))
    }

    #[cfg(not(feature = "sqlite"))]
    {
        Err(StockcastError::Database {
            reason: "no storage backend enabled at build time".into(),
        })
    }
}

fn run_ingest(
    fetcher: &dyn MarketDataPort,
    config: &dyn ConfigPort,
    symbol: &str,
    days: u32,
) -> ExitCode {
    let bars = match fetcher.fetch_daily(symbol, days) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if bars.is_empty() {
        eprintln!("warning: provider returned no bars for {symbol}");
    }

    let store = match open_store(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match store.upsert_bars(&bars) {
        Ok(count) => {
            eprintln!("Stored {count} bars for {symbol}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_fetch(config_path: &Path, symbol: Option<&str>, days: Option<u32>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = resolve_symbol(symbol, &config);
    let days = resolve_days(days, &config);

    eprintln!("Fetching {days} days of {symbol}...");

    let fetcher = match YahooAdapter::from_config(&config) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    run_ingest(&fetcher, &config, &symbol, days)
}

fn run_import(
    config_path: &Path,
    file: &Path,
    symbol: Option<&str>,
    days: Option<u32>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = resolve_symbol(symbol, &config);

    eprintln!("Importing {} as {symbol}...", file.display());

    let fetcher = CsvAdapter::new(file.to_path_buf());
    // Without --days an import takes the whole file.
    run_ingest(&fetcher, &config, &symbol, days.unwrap_or(u32::MAX))
}

fn read_series(
    config: &dyn ConfigPort,
    symbol: &str,
    limit: Option<usize>,
) -> Result<Vec<PriceBar>, StockcastError> {
    let store = open_store(config)?;
    let bars = store.read_bars(symbol, limit)?;
    if bars.is_empty() {
        return Err(StockcastError::NoData {
            symbol: symbol.to_string(),
        });
    }
    Ok(bars)
}

fn run_predict(
    config_path: &Path,
    symbol: Option<&str>,
    limit: Option<usize>,
    output: Option<&Path>,
    format: Option<&str>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = resolve_symbol(symbol, &config);

    let bars = match read_series(&config, &symbol, limit) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let prediction = match forecast::predict(&bars) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let summary = match statistics::summarize(&bars) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let last = &bars[bars.len() - 1];
    let change = prediction.next_day_price - last.close;
    let percent = change / last.close * 100.0;
    let sign = if change >= 0.0 { "+" } else { "" };

    eprintln!("\n=== Forecast for {symbol} ===");
    eprintln!("Bars used:         {}", bars.len());
    eprintln!("Current close:     {:.2} ({})", last.close, last.date);
    eprintln!(
        "Next-day estimate: {:.2} ({sign}{change:.2}, {sign}{percent:.2}%)",
        prediction.next_day_price
    );
    eprintln!("12-day EMA:        {:.2}", prediction.moving_average);
    eprintln!("Regression:        {:.2}", prediction.linear_regression);
    eprintln!("Trend:             {}", prediction.trend);
    eprintln!("Confidence:        {}", prediction.confidence);
    eprintln!("Volatility:        {:.2}%", summary.volatility);

    let Some(output) = output else {
        return ExitCode::SUCCESS;
    };

    let ctx = ReportContext {
        symbol: &symbol,
        as_of: last.date,
        current_price: last.close,
        prediction: &prediction,
        summary: &summary,
    };

    let format = format
        .map(str::to_string)
        .or_else(|| config.get_string("report", "format"))
        .unwrap_or_else(|| "text".to_string());

    let result = match format.as_str() {
        "text" => match TextReportAdapter::from_config(&config) {
            Ok(adapter) => adapter.write(&ctx, output),
            Err(e) => Err(e),
        },
        "json" => JsonReportAdapter.write(&ctx, output),
        other => Err(StockcastError::ConfigInvalid {
            section: "report".into(),
            key: "format".into(),
            reason: format!("unknown format {other:?} (expected text or json)"),
        }),
    };

    match result {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_stats(config_path: &Path, symbol: Option<&str>, limit: Option<usize>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = resolve_symbol(symbol, &config);

    let bars = match read_series(&config, &symbol, limit) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let summary = match statistics::summarize(&bars) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\n=== Statistics for {symbol} ===");
    eprintln!("Mean close:    {:.2}", summary.mean);
    eprintln!("Std deviation: {:.2}", summary.std_dev);
    eprintln!("Minimum:       {:.2}", summary.min);
    eprintln!("Maximum:       {:.2}", summary.max);
    eprintln!("Volatility:    {:.2}%", summary.volatility);
    eprintln!("Data points:   {}", summary.data_points);

    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = resolve_symbol(symbol, &config);

    let store = match open_store(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match store.data_range(&symbol) {
        Ok(Some((min_date, max_date, count))) => {
            println!("{symbol}: {count} bars, {min_date} to {max_date}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{symbol}: no data found");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match open_store(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match store.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols stored");
    } else {
        for symbol in &symbols {
            println!("{symbol}");
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
