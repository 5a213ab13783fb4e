//! Annualized volatility of day-over-day returns.
//!
//! Population standard deviation of simple returns over the last
//! min(period, len) bars, scaled by sqrt(252). Returned as a fraction;
//! callers multiply by 100 for percentage display.

use crate::domain::bar::PriceBar;

pub const DEFAULT_VOLATILITY_WINDOW: usize = 20;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

pub fn compute_volatility(bars: &[PriceBar], period: usize) -> f64 {
    let window = period.min(bars.len());
    // Fewer than 2 bars yields no returns; zero volatility, not a divide.
    if window < 2 {
        return 0.0;
    }

    let recent = &bars[bars.len() - window..];
    let returns: Vec<f64> = recent
        .windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect();

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
}
