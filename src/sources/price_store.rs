//! SQLite-backed daily price history.
//!
//! Exposes the history through the [`PriceSource`] trait so the
//! orchestration layer does not depend on the storage engine.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::types::PricePoint;

/// Source of recent daily price history.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// The most recent `days` points, ascending by date with no duplicates.
    async fn fetch_recent_price_series(&self, days: usize) -> Result<Vec<PricePoint>>;
}

/// SQLite store for daily OHLC history.
pub struct SqlitePriceStore {
    conn: Mutex<Connection>,
}

impl SqlitePriceStore {
    /// Open (or create) a store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite price store initialized");
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite price store initialized");
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("price store lock poisoned".to_string()))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS price_history (
                date TEXT PRIMARY KEY,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                change_percent REAL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert or replace points by date.
    ///
    /// A missing `change_percent` is derived from the closest earlier stored close.
    pub fn upsert_points(&self, points: &[PricePoint]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut previous_close = tx.prepare(
                "SELECT close FROM price_history WHERE date < ?1 ORDER BY date DESC LIMIT 1",
            )?;
            let mut upsert = tx.prepare(
                "INSERT INTO price_history (date, open, high, low, close, change_percent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(date) DO UPDATE SET
                    open = excluded.open,
                    high = excluded.high,
                    low = excluded.low,
                    close = excluded.close,
                    change_percent = excluded.change_percent",
            )?;

            for point in points {
                let change_percent = match point.change_percent {
                    Some(change) => Some(change),
                    None => previous_close
                        .query_row(params![point.date], |row| row.get::<_, f64>(0))
                        .optional()?
                        .filter(|prev| *prev != 0.0)
                        .map(|prev| (point.close - prev) / prev * 100.0),
                };

                upsert.execute(params![
                    point.date,
                    point.open,
                    point.high,
                    point.low,
                    point.close,
                    change_percent,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Upserted {} price points", points.len());
        Ok(points.len())
    }

    /// Number of stored days.
    pub fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM price_history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn recent(&self, days: usize) -> Result<Vec<PricePoint>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT date, open, high, low, close, change_percent FROM (
                SELECT * FROM price_history ORDER BY date DESC LIMIT ?1
             ) ORDER BY date ASC",
        )?;
        let limit = i64::try_from(days).unwrap_or(i64::MAX);
        let points = stmt
            .query_map(params![limit], |row| {
                Ok(PricePoint {
                    date: row.get(0)?,
                    open: row.get(1)?,
                    high: row.get(2)?,
                    low: row.get(3)?,
                    close: row.get(4)?,
                    change_percent: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(points)
    }
}

#[async_trait]
impl PriceSource for SqlitePriceStore {
    async fn fetch_recent_price_series(&self, days: usize) -> Result<Vec<PricePoint>> {
        self.recent(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint {
            date: date.to_string(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            change_percent: None,
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = SqlitePriceStore::new_in_memory().unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.fetch_recent_price_series(30).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_returns_ascending_recent_window() {
        let store = SqlitePriceStore::new_in_memory().unwrap();
        store
            .upsert_points(&[
                point("2024-01-03", 103.0),
                point("2024-01-01", 101.0),
                point("2024-01-04", 104.0),
                point("2024-01-02", 102.0),
            ])
            .unwrap();

        let recent = store.fetch_recent_price_series(3).await.unwrap();
        let dates: Vec<&str> = recent.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
        assert_eq!(recent[2].open, 103.0);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_date() {
        let store = SqlitePriceStore::new_in_memory().unwrap();
        store.upsert_points(&[point("2024-01-01", 100.0)]).unwrap();
        store.upsert_points(&[point("2024-01-01", 105.0)]).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        let recent = store.fetch_recent_price_series(10).await.unwrap();
        assert_eq!(recent[0].close, 105.0);
    }

    #[tokio::test]
    async fn test_change_percent_derived_from_previous_close() {
        let store = SqlitePriceStore::new_in_memory().unwrap();
        store
            .upsert_points(&[point("2024-01-01", 100.0), point("2024-01-02", 110.0)])
            .unwrap();
        let mut explicit = point("2024-01-03", 99.0);
        explicit.change_percent = Some(-1.5);
        store.upsert_points(&[explicit]).unwrap();

        let recent = store.fetch_recent_price_series(10).await.unwrap();
        assert_eq!(recent[0].change_percent, None);
        let derived = recent[1].change_percent.unwrap();
        assert!((derived - 10.0).abs() < 1e-9);
        assert_eq!(recent[2].change_percent, Some(-1.5));
    }

    #[tokio::test]
    async fn test_zero_days() {
        let store = SqlitePriceStore::new_in_memory().unwrap();
        store.upsert_points(&[point("2024-01-01", 100.0)]).unwrap();
        assert!(store.fetch_recent_price_series(0).await.unwrap().is_empty());
    }
}
