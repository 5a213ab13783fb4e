//! Descriptive statistics over a price series.

use serde::Serialize;

use crate::domain::bar::{closes, PriceBar};
use crate::domain::error::StockcastError;
use crate::domain::forecast::round2;
use crate::domain::forecast::volatility::{compute_volatility, DEFAULT_VOLATILITY_WINDOW};

/// Summary of closing prices. `volatility` is an annualized percentage;
/// everything else is in price units, 2-decimal rounded at this boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub volatility: f64,
    pub data_points: usize,
}

pub fn summarize(bars: &[PriceBar]) -> Result<StatisticsSummary, StockcastError> {
    if bars.is_empty() {
        return Err(StockcastError::EmptySeries);
    }

    let n = bars.len() as f64;
    let mean: f64 = closes(bars).sum::<f64>() / n;
    let variance: f64 = closes(bars).map(|c| (c - mean).powi(2)).sum::<f64>() / n;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for close in closes(bars) {
        min = min.min(close);
        max = max.max(close);
    }

    Ok(StatisticsSummary {
        mean: round2(mean),
        std_dev: round2(variance.sqrt()),
        min: round2(min),
        max: round2(max),
        volatility: round2(compute_volatility(bars, DEFAULT_VOLATILITY_WINDOW) * 100.0),
        data_points: bars.len(),
    })
}
