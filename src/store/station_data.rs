use super::query::build_select;
use super::{StationDataQuery, Store};
use crate::error::Result;
use crate::models::{DailyObservation, StationDataRow};
use crate::utils::constants::STATION_DATA_TABLE;
use rusqlite::{Row, ToSql};

const ROW_COLUMNS: &str = "id, station_id, date, max_temp, min_temp, total_precip";

fn upsert_sql(rows: usize) -> String {
    let placeholders = vec!["(?, ?, ?, ?, ?)"; rows].join(", ");
    format!(
        "INSERT INTO {STATION_DATA_TABLE} (station_id, date, max_temp, min_temp, total_precip)
         VALUES {placeholders}
         ON CONFLICT(station_id, date) DO UPDATE SET
            max_temp = excluded.max_temp,
            min_temp = excluded.min_temp,
            total_precip = excluded.total_precip"
    )
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<StationDataRow> {
    Ok(StationDataRow {
        id: row.get(0)?,
        station_id: row.get(1)?,
        date: row.get(2)?,
        max_temp: row.get(3)?,
        min_temp: row.get(4)?,
        total_precip: row.get(5)?,
    })
}

impl Store {
    /// Insert or overwrite one batch of observations in a single transaction.
    ///
    /// Returns the number of rows touched (inserted or updated).
    pub fn upsert_observations(&mut self, batch: &[DailyObservation]) -> rusqlite::Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let params: Vec<&dyn ToSql> = batch
            .iter()
            .flat_map(|obs| {
                [
                    &obs.station_id as &dyn ToSql,
                    &obs.date,
                    &obs.max_temp,
                    &obs.min_temp,
                    &obs.total_precip,
                ]
            })
            .collect();

        let tx = self.conn.transaction()?;
        let touched = {
            let mut stmt = tx.prepare_cached(&upsert_sql(batch.len()))?;
            stmt.execute(params.as_slice())?
        };
        tx.commit()?;

        Ok(touched)
    }

    /// Every stored observation, ordered by station then date.
    pub fn daily_observations(&self) -> Result<Vec<DailyObservation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT station_id, date, max_temp, min_temp, total_precip
             FROM {STATION_DATA_TABLE}
             ORDER BY station_id, date"
        ))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(DailyObservation::new(
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn list_station_data(&self, query: &StationDataQuery) -> Result<Vec<StationDataRow>> {
        let (sql, params) = build_select(
            &format!("SELECT {ROW_COLUMNS} FROM {STATION_DATA_TABLE}"),
            vec![
                ("station_id", query.station_id.as_ref().map(|s| s as &dyn ToSql)),
                ("date", query.date.as_ref().map(|d| d as &dyn ToSql)),
            ],
            [&query.limit, &query.offset],
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params.as_slice(), map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn count_station_data(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {STATION_DATA_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
