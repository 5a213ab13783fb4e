//! JSON forecast report.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::domain::error::StockcastError;
use crate::domain::forecast::Prediction;
use crate::domain::statistics::StatisticsSummary;
use crate::ports::report_port::{ReportContext, ReportPort};

#[derive(Serialize)]
struct JsonReport<'a> {
    symbol: &'a str,
    as_of: String,
    current_price: f64,
    prediction: &'a Prediction,
    statistics: &'a StatisticsSummary,
}

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn render(ctx: &ReportContext) -> Result<String, StockcastError> {
        let report = JsonReport {
            symbol: ctx.symbol,
            as_of: ctx.as_of.format("%Y-%m-%d").to_string(),
            current_price: ctx.current_price,
            prediction: ctx.prediction,
            statistics: ctx.summary,
        };

        serde_json::to_string_pretty(&report)
            .map_err(|e| StockcastError::Io(std::io::Error::other(e)))
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), StockcastError> {
        fs::write(output_path, Self::render(ctx)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::{Confidence, Trend};
    use chrono::NaiveDate;

    #[test]
    fn render_round_trips_through_serde_json() {
        let prediction = Prediction {
            next_day_price: 101.23,
            moving_average: 100.5,
            linear_regression: 102.0,
            confidence: Confidence::Medium,
            trend: Trend::Up,
        };
        let summary = StatisticsSummary {
            mean: 100.0,
            std_dev: 1.5,
            min: 98.0,
            max: 102.5,
            volatility: 12.34,
            data_points: 75,
        };
        let ctx = ReportContext {
            symbol: "VUKE.L",
            as_of: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            current_price: 100.9,
            prediction: &prediction,
            summary: &summary,
        };

        let json = JsonReportAdapter::render(&ctx).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["symbol"], "VUKE.L");
        assert_eq!(value["as_of"], "2024-06-28");
        assert_eq!(value["prediction"]["nextDayPrice"], 101.23);
        assert_eq!(value["prediction"]["trend"], "up");
        assert_eq!(value["prediction"]["confidence"], "Medium");
        assert_eq!(value["statistics"]["dataPoints"], 75);
    }
}
