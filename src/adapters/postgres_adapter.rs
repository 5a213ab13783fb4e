//! PostgreSQL price history store.

use crate::domain::bar::PriceBar;
use crate::domain::error::StockcastError;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;
use chrono::NaiveDate;
use postgres::{Client, NoTls};
use std::cell::RefCell;

pub struct PostgresAdapter {
    client: RefCell<Client>,
}

impl PostgresAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockcastError> {
        // Try [postgres] connection_string first, fall back to [database] conninfo
        let connection_string = config
            .get_string("postgres", "connection_string")
            .or_else(|| config.get_string("database", "conninfo"))
            .ok_or_else(|| StockcastError::ConfigMissing {
                section: "postgres".into(),
                key: "connection_string".into(),
            })?;

        let client =
            Client::connect(&connection_string, NoTls).map_err(|e| StockcastError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client: RefCell::new(client),
        })
    }

    pub fn initialize_schema(&self) -> Result<(), StockcastError> {
        self.client
            .borrow_mut()
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS price_bars (
                    symbol TEXT NOT NULL,
                    date DATE NOT NULL,
                    open DOUBLE PRECISION NOT NULL,
                    high DOUBLE PRECISION NOT NULL,
                    low DOUBLE PRECISION NOT NULL,
                    close DOUBLE PRECISION NOT NULL,
                    volume BIGINT NOT NULL,
                    PRIMARY KEY (symbol, date)
                )",
            )
            .map_err(|e| StockcastError::DatabaseQuery {
                reason: e.to_string(),
            })
    }
}

impl StorePort for PostgresAdapter {
    fn upsert_bars(&self, bars: &[PriceBar]) -> Result<usize, StockcastError> {
        let mut client = self.client.borrow_mut();
        let mut tx = client.transaction().map_err(|e| StockcastError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        for bar in bars {
            tx.execute(
                "INSERT INTO price_bars (symbol, date, open, high, low, close, volume)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (symbol, date) DO UPDATE SET
                     open = EXCLUDED.open,
                     high = EXCLUDED.high,
                     low = EXCLUDED.low,
                     close = EXCLUDED.close,
                     volume = EXCLUDED.volume",
                &[
                    &bar.symbol,
                    &bar.date,
                    &bar.open,
                    &bar.high,
                    &bar.low,
                    &bar.close,
                    &bar.volume,
                ],
            )
            .map_err(|e| StockcastError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit().map_err(|e| StockcastError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(bars.len())
    }

    fn read_bars(
        &self,
        symbol: &str,
        limit: Option<usize>,
    ) -> Result<Vec<PriceBar>, StockcastError> {
        let mut client = self.client.borrow_mut();

        let rows = match limit {
            Some(n) => client.query(
                "SELECT symbol, date, open, high, low, close, volume
                 FROM price_bars WHERE symbol = $1
                 ORDER BY date DESC LIMIT $2",
                &[&symbol, &(n as i64)],
            ),
            None => client.query(
                "SELECT symbol, date, open, high, low, close, volume
                 FROM price_bars WHERE symbol = $1
                 ORDER BY date ASC",
                &[&symbol],
            ),
        }
        .map_err(|e| StockcastError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        let mut bars: Vec<PriceBar> = rows
            .iter()
            .map(|row| PriceBar {
                symbol: row.get(0),
                date: row.get(1),
                open: row.get(2),
                high: row.get(3),
                low: row.get(4),
                close: row.get(5),
                volume: row.get(6),
            })
            .collect();

        if limit.is_some() {
            bars.reverse();
        }

        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockcastError> {
        let mut client = self.client.borrow_mut();

        let rows = client
            .query(
                "SELECT DISTINCT symbol FROM price_bars ORDER BY symbol",
                &[],
            )
            .map_err(|e| StockcastError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StockcastError> {
        let mut client = self.client.borrow_mut();

        let row = client
            .query_one(
                "SELECT MIN(date), MAX(date), COUNT(*) FROM price_bars WHERE symbol = $1",
                &[&symbol],
            )
            .map_err(|e| StockcastError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let min: Option<NaiveDate> = row.get(0);
        let max: Option<NaiveDate> = row.get(1);
        let count: i64 = row.get(2);

        match (min, max) {
            (Some(min), Some(max)) if count > 0 => Ok(Some((min, max, count as usize))),
            _ => Ok(None),
        }
    }
}
