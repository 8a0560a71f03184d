//! SQLite-backed relational store for daily observations and yearly summaries.
//!
//! Both tables carry a natural-key uniqueness constraint; all writes go through
//! `INSERT ... ON CONFLICT DO UPDATE` so re-running a load overwrites the
//! measurement columns in place and keeps each row's surrogate `id`.

pub mod query;
pub mod station_data;
pub mod station_summary;

pub use query::{StationDataQuery, SummaryQuery};

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS station_data (
    id INTEGER PRIMARY KEY,
    station_id VARCHAR(50) NOT NULL,
    date TEXT NOT NULL,
    max_temp FLOAT,
    min_temp FLOAT,
    total_precip FLOAT,
    CONSTRAINT station_data_constraint UNIQUE (station_id, date)
);

CREATE TABLE IF NOT EXISTS station_summary (
    id INTEGER PRIMARY KEY,
    station_id VARCHAR(50) NOT NULL,
    year INTEGER NOT NULL,
    avg_max_temp FLOAT,
    avg_min_temp FLOAT,
    cumulative_precip FLOAT,
    CONSTRAINT station_year_constraint UNIQUE (station_id, year)
);
";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a database file. WAL mode lets readers proceed while a
    /// merge transaction is open.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(path = %path.display(), journal_mode = %mode, "Opened database");

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Create both tables if they do not exist yet.
    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Open a database and make sure the schema is in place.
    pub fn open_initialized(path: &Path) -> Result<Self> {
        let store = Self::open(path)?;
        store.init_schema()?;
        Ok(store)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
