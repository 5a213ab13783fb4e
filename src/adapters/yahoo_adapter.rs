//! Yahoo Finance chart API fetch adapter.
//!
//! `GET /v8/finance/chart/{symbol}?period1=..&period2=..&interval=1d`
//! returns parallel arrays of timestamps and OHLCV values, any entry of
//! which may be null. Rows without a closing price are dropped; null
//! open/high/low fall back to the close and null volume to 0.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::bar::PriceBar;
use crate::domain::error::StockcastError;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: String) -> Result<Self, StockcastError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StockcastError::Fetch {
                reason: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockcastError> {
        let base_url = config
            .get_string("yahoo", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }
}

impl MarketDataPort for YahooAdapter {
    fn fetch_daily(&self, symbol: &str, days: u32) -> Result<Vec<PriceBar>, StockcastError> {
        let period2 = Utc::now().timestamp();
        let period1 = period2 - i64::from(days) * SECONDS_PER_DAY;
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        );

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| StockcastError::Fetch {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(StockcastError::Fetch {
                reason: format!("{} returned status {}", self.base_url, response.status()),
            });
        }

        let body = response.text().map_err(|e| StockcastError::Fetch {
            reason: e.to_string(),
        })?;

        parse_chart_response(symbol, &body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteBlock {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}

/// Decode a chart payload into ascending bars, dropping null-close rows.
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<Vec<PriceBar>, StockcastError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| StockcastError::UpstreamData {
            reason: format!("failed to parse chart payload: {e}"),
        })?;

    if let Some(error) = &response.chart.error {
        if !error.is_null() {
            return Err(StockcastError::UpstreamData {
                reason: format!("chart API error: {error}"),
            });
        }
    }

    let result = response
        .chart
        .result
        .as_ref()
        .and_then(|r| r.first())
        .ok_or_else(|| StockcastError::UpstreamData {
            reason: "no chart data in response".into(),
        })?;

    let timestamps = result.timestamp.as_deref().unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| StockcastError::UpstreamData {
            reason: "no quote data in response".into(),
        })?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };

        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| StockcastError::UpstreamData {
                reason: format!("invalid timestamp {ts}"),
            })?
            .date_naive();

        bars.push(PriceBar {
            symbol: symbol.to_string(),
            date,
            open: quote.open.get(i).copied().flatten().unwrap_or(close),
            high: quote.high.get(i).copied().flatten().unwrap_or(close),
            low: quote.low.get(i).copied().flatten().unwrap_or(close),
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    Ok(bars)
}
