//! Exponential moving average over closing prices.
//!
//! α = 2/(n+1), seed with the SMA of the first n closes, then
//! ema = (C[i] − ema)·α + ema for every bar after the seed window.
//! Series shorter than n fall back to the plain mean of all closes.

use crate::domain::bar::PriceBar;

pub fn compute_ema(bars: &[PriceBar], period: usize) -> f64 {
    if bars.is_empty() || period == 0 {
        return 0.0;
    }

    if bars.len() < period {
        let sum: f64 = bars.iter().map(|b| b.close).sum();
        return sum / bars.len() as f64;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed: f64 = bars[..period].iter().map(|b| b.close).sum::<f64>() / period as f64;

    bars[period..]
        .iter()
        .fold(seed, |ema, bar| (bar.close - ema) * alpha + ema)
}
