//! Linear regression trend projection.
//!
//! Ordinary least squares over the last ≤30 closes with index positions as
//! the x-axis, evaluated one step past the window. Index spacing means
//! weekend/holiday gaps are treated as equal-spaced by design.

use crate::domain::bar::PriceBar;

pub const REGRESSION_WINDOW: usize = 30;

pub fn compute_linear_regression(bars: &[PriceBar]) -> f64 {
    let n = bars.len().min(REGRESSION_WINDOW);
    if n == 0 {
        return 0.0;
    }

    let recent = &bars[bars.len() - n..];
    if n == 1 {
        return recent[0].close;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;

    for (i, bar) in recent.iter().enumerate() {
        let x = i as f64;
        let y = bar.close;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let n_f = n as f64;
    let denominator = n_f * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return recent[n - 1].close;
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n_f;

    slope * n_f + intercept
}
