//! Price history store port trait.

use crate::domain::bar::PriceBar;
use crate::domain::error::StockcastError;
use chrono::NaiveDate;

pub trait StorePort {
    /// Insert or overwrite bars keyed by (symbol, date). Re-fetching the
    /// same range never duplicates. Returns the number of bars written.
    fn upsert_bars(&self, bars: &[PriceBar]) -> Result<usize, StockcastError>;

    /// Bars for a symbol, ascending by date. `limit` caps the result to the
    /// most recent bars.
    fn read_bars(
        &self,
        symbol: &str,
        limit: Option<usize>,
    ) -> Result<Vec<PriceBar>, StockcastError>;

    fn list_symbols(&self) -> Result<Vec<String>, StockcastError>;

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StockcastError>;
}
