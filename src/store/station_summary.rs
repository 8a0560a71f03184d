use super::query::build_select;
use super::{Store, SummaryQuery};
use crate::error::Result;
use crate::models::{StationSummaryRow, YearlySummary};
use crate::utils::constants::STATION_SUMMARY_TABLE;
use rusqlite::{Row, ToSql};

const ROW_COLUMNS: &str = "id, station_id, year, avg_max_temp, avg_min_temp, cumulative_precip";

fn upsert_sql(rows: usize) -> String {
    let placeholders = vec!["(?, ?, ?, ?, ?)"; rows].join(", ");
    format!(
        "INSERT INTO {STATION_SUMMARY_TABLE}
            (station_id, year, avg_max_temp, avg_min_temp, cumulative_precip)
         VALUES {placeholders}
         ON CONFLICT(station_id, year) DO UPDATE SET
            avg_max_temp = excluded.avg_max_temp,
            avg_min_temp = excluded.avg_min_temp,
            cumulative_precip = excluded.cumulative_precip"
    )
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<StationSummaryRow> {
    Ok(StationSummaryRow {
        id: row.get(0)?,
        station_id: row.get(1)?,
        year: row.get(2)?,
        avg_max_temp: row.get(3)?,
        avg_min_temp: row.get(4)?,
        cumulative_precip: row.get(5)?,
    })
}

impl Store {
    /// Insert or overwrite one batch of yearly summaries in a single transaction.
    pub fn upsert_summaries(&mut self, batch: &[YearlySummary]) -> rusqlite::Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let params: Vec<&dyn ToSql> = batch
            .iter()
            .flat_map(|s| {
                [
                    &s.station_id as &dyn ToSql,
                    &s.year,
                    &s.avg_max_temp,
                    &s.avg_min_temp,
                    &s.cumulative_precip,
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

    pub fn list_station_summaries(&self, query: &SummaryQuery) -> Result<Vec<StationSummaryRow>> {
        let (sql, params) = build_select(
            &format!("SELECT {ROW_COLUMNS} FROM {STATION_SUMMARY_TABLE}"),
            vec![
                ("station_id", query.station_id.as_ref().map(|s| s as &dyn ToSql)),
                ("year", query.year.as_ref().map(|y| y as &dyn ToSql)),
            ],
            [&query.limit, &query.offset],
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params.as_slice(), map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn count_station_summaries(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {STATION_SUMMARY_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
