//! Upstream market-data fetch port trait.

use crate::domain::bar::PriceBar;
use crate::domain::error::StockcastError;

pub trait MarketDataPort {
    /// Daily OHLCV bars for `symbol` over a trailing `days` window,
    /// ascending by date. Days without a closing price are excluded.
    fn fetch_daily(&self, symbol: &str, days: u32) -> Result<Vec<PriceBar>, StockcastError>;
}
