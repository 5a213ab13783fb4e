//! Report generation port trait.

use chrono::NaiveDate;
use std::path::Path;

use crate::domain::error::StockcastError;
use crate::domain::forecast::Prediction;
use crate::domain::statistics::StatisticsSummary;

/// Everything a renderer needs for one forecast report.
pub struct ReportContext<'a> {
    pub symbol: &'a str,
    pub as_of: NaiveDate,
    pub current_price: f64,
    pub prediction: &'a Prediction,
    pub summary: &'a StatisticsSummary,
}

/// Port for writing forecast reports.
pub trait ReportPort {
    fn write(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), StockcastError>;
}
