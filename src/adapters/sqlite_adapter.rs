//! SQLite price history store.

use crate::domain::bar::PriceBar;
use crate::domain::error::StockcastError;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;
use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockcastError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| StockcastError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| StockcastError::Database {
                    reason: e.to_string(),
                })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, StockcastError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| StockcastError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), StockcastError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockcastError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS price_bars (
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (symbol, date)
            );
            CREATE INDEX IF NOT EXISTS idx_price_bars_symbol ON price_bars(symbol);",
        )
        .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

fn decode_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PriceBar> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            date_str.len(),
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })?;
    Ok(PriceBar {
        symbol: row.get(0)?,
        date,
        open: row.get(2)?,
        high: row.get(3)?,
        low: row.get(4)?,
        close: row.get(5)?,
        volume: row.get(6)?,
    })
}

impl StorePort for SqliteAdapter {
    fn upsert_bars(&self, bars: &[PriceBar]) -> Result<usize, StockcastError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockcastError::Database {
                reason: e.to_string(),
            })?;

        let tx =
            conn.transaction()
                .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        for bar in bars {
            tx.execute(
                "INSERT OR REPLACE INTO price_bars (symbol, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    bar.symbol,
                    bar.date.format("%Y-%m-%d").to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                ],
            )
            .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(bars.len())
    }

    fn read_bars(
        &self,
        symbol: &str,
        limit: Option<usize>,
    ) -> Result<Vec<PriceBar>, StockcastError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockcastError::Database {
                reason: e.to_string(),
            })?;

        // A capped read takes the newest rows, then restores ascending order.
        let query = match limit {
            Some(_) => {
                "SELECT symbol, date, open, high, low, close, volume
                 FROM price_bars WHERE symbol = ?1
                 ORDER BY date DESC LIMIT ?2"
            }
            None => {
                "SELECT symbol, date, open, high, low, close, volume
                 FROM price_bars WHERE symbol = ?1
                 ORDER BY date ASC"
            }
        };

        let mut stmt =
            conn.prepare(query)
                .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let mut bars = Vec::new();
        match limit {
            Some(n) => {
                let rows = stmt
                    .query_map(params![symbol, n as i64], decode_row)
                    .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                        reason: e.to_string(),
                    })?;
                for row in rows {
                    bars.push(row.map_err(|e: rusqlite::Error| {
                        StockcastError::DatabaseQuery {
                            reason: e.to_string(),
                        }
                    })?);
                }
                bars.reverse();
            }
            None => {
                let rows = stmt
                    .query_map(params![symbol], decode_row)
                    .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                        reason: e.to_string(),
                    })?;
                for row in rows {
                    bars.push(row.map_err(|e: rusqlite::Error| {
                        StockcastError::DatabaseQuery {
                            reason: e.to_string(),
                        }
                    })?);
                }
            }
        }

        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockcastError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockcastError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT DISTINCT symbol FROM price_bars ORDER BY symbol";

        let mut stmt =
            conn.prepare(query)
                .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut symbols = Vec::new();
        for row in rows {
            symbols.push(
                row.map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StockcastError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockcastError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT MIN(date), MAX(date), COUNT(*) FROM price_bars WHERE symbol = ?1";

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(query, params![symbol], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e: rusqlite::Error| StockcastError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                let min = NaiveDate::parse_from_str(&min_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| StockcastError::Database {
                        reason: e.to_string(),
                    },
                )?;
                let max = NaiveDate::parse_from_str(&max_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| StockcastError::Database {
                        reason: e.to_string(),
                    },
                )?;
                Ok(Some((min, max, count as usize)))
            }
            _ => Ok(None),
        }
    }
}
