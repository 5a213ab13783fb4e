//! Daily price bar representation.

use chrono::NaiveDate;

/// One trading day's record for one symbol. At most one bar exists per
/// (symbol, date); the store enforces this with upsert semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Closing prices of a series in bar order.
pub fn closes(bars: &[PriceBar]) -> impl Iterator<Item = f64> + '_ {
    bars.iter().map(|b| b.close)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                symbol: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn closes_preserves_order() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let collected: Vec<f64> = closes(&bars).collect();
        assert_eq!(collected, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn closes_empty_series() {
        let bars: Vec<PriceBar> = vec![];
        assert_eq!(closes(&bars).count(), 0);
    }
}
