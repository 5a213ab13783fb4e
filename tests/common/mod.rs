#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use stockcast::domain::bar::PriceBar;
use stockcast::domain::error::StockcastError;
use stockcast::ports::market_data_port::MarketDataPort;
use stockcast::ports::store_port::StorePort;

pub struct MockStorePort {
    data: RefCell<HashMap<String, Vec<PriceBar>>>,
    error: Option<String>,
}

impl MockStorePort {
    pub fn new() -> Self {
        Self {
            data: RefCell::new(HashMap::new()),
            error: None,
        }
    }

    pub fn with_bars(self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.borrow_mut().insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    pub fn stored_count(&self, symbol: &str) -> usize {
        self.data
            .borrow()
            .get(symbol)
            .map(Vec::len)
            .unwrap_or_default()
    }

    fn check_error(&self) -> Result<(), StockcastError> {
        match &self.error {
            Some(reason) => Err(StockcastError::Database {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl StorePort for MockStorePort {
    fn upsert_bars(&self, bars: &[PriceBar]) -> Result<usize, StockcastError> {
        self.check_error()?;

        let mut data = self.data.borrow_mut();
        for bar in bars {
            let series = data.entry(bar.symbol.clone()).or_default();
            match series.iter_mut().find(|b| b.date == bar.date) {
                Some(existing) => *existing = bar.clone(),
                None => series.push(bar.clone()),
            }
            series.sort_by_key(|b| b.date);
        }

        Ok(bars.len())
    }

    fn read_bars(
        &self,
        symbol: &str,
        limit: Option<usize>,
    ) -> Result<Vec<PriceBar>, StockcastError> {
        self.check_error()?;

        let mut bars = self
            .data
            .borrow()
            .get(symbol)
            .cloned()
            .unwrap_or_default();
        bars.sort_by_key(|b| b.date);

        if let Some(n) = limit {
            if bars.len() > n {
                let excess = bars.len() - n;
                bars.drain(..excess);
            }
        }

        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockcastError> {
        self.check_error()?;

        let mut symbols: Vec<String> = self.data.borrow().keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StockcastError> {
        self.check_error()?;

        match self.data.borrow().get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub struct MockMarketDataPort {
    pub bars: Vec<PriceBar>,
    pub error: Option<String>,
}

impl MockMarketDataPort {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_daily(&self, symbol: &str, days: u32) -> Result<Vec<PriceBar>, StockcastError> {
        if let Some(reason) = &self.error {
            return Err(StockcastError::Fetch {
                reason: reason.clone(),
            });
        }

        let mut bars: Vec<PriceBar> = self
            .bars
            .iter()
            .cloned()
            .map(|mut b| {
                b.symbol = symbol.to_string();
                b
            })
            .collect();
        bars.sort_by_key(|b| b.date);

        let days = days as usize;
        if bars.len() > days {
            let excess = bars.len() - days;
            bars.drain(..excess);
        }

        Ok(bars)
    }
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn generate_bars(symbol: &str, start_date: &str, count: usize, start_price: f64) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| PriceBar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000,
        })
        .collect()
}

/// Bars whose closes run linearly from `first_close` to `last_close`.
pub fn generate_linear_bars(
    symbol: &str,
    count: usize,
    first_close: f64,
    last_close: f64,
) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let step = if count > 1 {
        (last_close - first_close) / (count - 1) as f64
    } else {
        0.0
    };

    (0..count)
        .map(|i| {
            let close = first_close + step * i as f64;
            PriceBar {
                symbol: symbol.to_string(),
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1000,
            }
        })
        .collect()
}
