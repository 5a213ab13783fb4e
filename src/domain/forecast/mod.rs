//! Next-day closing price forecast.
//!
//! The model is a fixed-weight blend: 40% 12-day EMA, 30% 26-day EMA and
//! 30% linear regression projection. The implied move against the last
//! close is classified with a ±0.5% dead zone, and confidence grades sample
//! size against annualized volatility. This is an illustrative estimator,
//! not a trading signal.

pub mod ema;
pub mod regression;
pub mod volatility;

use serde::Serialize;
use std::fmt;

use crate::domain::bar::PriceBar;
use crate::domain::error::StockcastError;
use self::ema::compute_ema;
use self::regression::compute_linear_regression;
use self::volatility::{compute_volatility, DEFAULT_VOLATILITY_WINDOW};

const EMA_FAST_PERIOD: usize = 12;
const EMA_SLOW_PERIOD: usize = 26;
const EMA_FAST_WEIGHT: f64 = 0.4;
const EMA_SLOW_WEIGHT: f64 = 0.3;
const REGRESSION_WEIGHT: f64 = 0.3;
const TREND_DEAD_ZONE_PCT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// Forecast output. Derived fresh on every call; prices carry 2-decimal
/// rounding applied once at this boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub next_day_price: f64,
    pub moving_average: f64,
    pub linear_regression: f64,
    pub confidence: Confidence,
    pub trend: Trend,
}

/// Round to 2 decimals at the output boundary. Intermediate math keeps full
/// precision so rounding error never compounds through the blend.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn predict(bars: &[PriceBar]) -> Result<Prediction, StockcastError> {
    let current = bars.last().ok_or(StockcastError::EmptySeries)?.close;

    let ema_fast = compute_ema(bars, EMA_FAST_PERIOD);
    let ema_slow = compute_ema(bars, EMA_SLOW_PERIOD);
    let lr = compute_linear_regression(bars);

    let combined =
        ema_fast * EMA_FAST_WEIGHT + ema_slow * EMA_SLOW_WEIGHT + lr * REGRESSION_WEIGHT;
    let percent_change = (combined - current) / current * 100.0;

    let volatility_pct = compute_volatility(bars, DEFAULT_VOLATILITY_WINDOW) * 100.0;

    Ok(Prediction {
        next_day_price: round2(combined),
        moving_average: round2(ema_fast),
        linear_regression: round2(lr),
        confidence: classify_confidence(bars.len(), volatility_pct),
        trend: classify_trend(percent_change),
    })
}

/// A move inside the dead zone is noise, not a trend. Exactly ±0.5% stays
/// neutral.
pub fn classify_trend(percent_change: f64) -> Trend {
    if percent_change > TREND_DEAD_ZONE_PCT {
        Trend::Up
    } else if percent_change < -TREND_DEAD_ZONE_PCT {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

/// Sample size gates the ceiling; volatility degrades within it.
pub fn classify_confidence(data_points: usize, volatility_pct: f64) -> Confidence {
    if data_points >= 100 {
        if volatility_pct < 15.0 {
            Confidence::High
        } else if volatility_pct < 25.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    } else if data_points >= 50 {
        if volatility_pct < 15.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    } else {
        Confidence::Low
    }
}
