//! Plain-text forecast report.
//!
//! Resolves `{{PLACEHOLDER}}` markers in a template (the built-in default or
//! a file named by `[report] template_path`) and writes the result.

use std::fs;
use std::path::Path;

use crate::domain::error::StockcastError;
use crate::domain::statistics::StatisticsSummary;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::{ReportContext, ReportPort};

const DEFAULT_TEMPLATE: &str = "\
Stock Forecast Report
=====================

Symbol:    {{SYMBOL}}
As of:     {{AS_OF}}
Bars used: {{DATA_POINTS}}

Prediction
----------
{{PREDICTION_TABLE}}

Statistics
----------
{{STATISTICS_TABLE}}

The estimate blends the 12-day EMA (40%), the 26-day EMA (30%) and a linear
regression projection (30%). Confidence grades sample size against
annualized volatility. This is an illustrative estimator, not advice.
";

#[derive(Default)]
pub struct TextReportAdapter {
    template: Option<String>,
}

impl TextReportAdapter {
    pub fn new() -> Self {
        Self { template: None }
    }

    pub fn with_template(template: String) -> Self {
        Self {
            template: Some(template),
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockcastError> {
        match config.get_string("report", "template_path") {
            Some(path) => {
                let template = fs::read_to_string(&path)?;
                Ok(Self::with_template(template))
            }
            None => Ok(Self::new()),
        }
    }

    /// Resolve every placeholder against the context.
    pub fn resolve(&self, ctx: &ReportContext) -> String {
        let template = self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);

        let mut output = template.to_string();
        output = output.replace("{{SYMBOL}}", ctx.symbol);
        output = output.replace("{{AS_OF}}", &ctx.as_of.format("%Y-%m-%d").to_string());
        output = output.replace("{{DATA_POINTS}}", &ctx.summary.data_points.to_string());
        output = output.replace("{{PREDICTION_TABLE}}", &render_prediction_table(ctx));
        output = output.replace("{{STATISTICS_TABLE}}", &render_statistics_table(ctx.summary));
        output
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), StockcastError> {
        fs::write(output_path, self.resolve(ctx))?;
        Ok(())
    }
}

fn render_prediction_table(ctx: &ReportContext) -> String {
    let p = ctx.prediction;
    let change = p.next_day_price - ctx.current_price;
    let percent = change / ctx.current_price * 100.0;
    let sign = if change >= 0.0 { "+" } else { "" };

    format!(
        "Current close:      {current:.2}\n\
         Next-day estimate:  {next:.2} ({sign}{change:.2}, {sign}{percent:.2}%)\n\
         12-day EMA:         {ema:.2}\n\
         Regression:         {lr:.2}\n\
         Trend:              {trend}\n\
         Confidence:         {confidence}",
        current = ctx.current_price,
        next = p.next_day_price,
        sign = sign,
        change = change,
        percent = percent,
        ema = p.moving_average,
        lr = p.linear_regression,
        trend = p.trend,
        confidence = p.confidence,
    )
}

fn render_statistics_table(summary: &StatisticsSummary) -> String {
    format!(
        "Mean close:         {mean:.2}\n\
         Std deviation:      {std_dev:.2}\n\
         Minimum:            {min:.2}\n\
         Maximum:            {max:.2}\n\
         Volatility:         {volatility:.2}%\n\
         Data points:        {points}",
        mean = summary.mean,
        std_dev = summary.std_dev,
        min = summary.min,
        max = summary.max,
        volatility = summary.volatility,
        points = summary.data_points,
    )
}
