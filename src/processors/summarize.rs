use crate::error::{ProcessingError, Result};
use crate::models::{round_to_one_decimal, DailyObservation, YearlySummary};
use crate::store::Store;
use crate::utils::chunks::{chunked, validate_chunk_size};
use crate::utils::constants::{DEFAULT_CHUNK_SIZE, STATION_SUMMARY_COLUMNS, STATION_SUMMARY_TABLE};
use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Running sum and count of the non-null values of one field. The sum is
/// Neumaier-compensated, like SQLite's `sum()`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct FieldAccumulator {
    sum: f64,
    compensation: f64,
    count: usize,
}

impl FieldAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            let t = self.sum + v;
            if self.sum.abs() >= v.abs() {
                self.compensation += (self.sum - t) + v;
            } else {
                self.compensation += (v - t) + self.sum;
            }
            self.sum = t;
            self.count += 1;
        }
    }

    fn total(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum + self.compensation)
    }

    fn mean(&self) -> Option<f64> {
        self.total().map(|total| total / self.count as f64)
    }
}

/// Null-aware aggregates for one station-year. A field with no values
/// aggregates to `None`, never to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearAccumulator {
    max_temp: FieldAccumulator,
    min_temp: FieldAccumulator,
    total_precip: FieldAccumulator,
}

impl YearAccumulator {
    pub fn push(&mut self, observation: &DailyObservation) {
        self.max_temp.push(observation.max_temp);
        self.min_temp.push(observation.min_temp);
        self.total_precip.push(observation.total_precip);
    }

    pub fn avg_max_temp(&self) -> Option<f64> {
        self.max_temp.mean().map(round_to_one_decimal)
    }

    pub fn avg_min_temp(&self) -> Option<f64> {
        self.min_temp.mean().map(round_to_one_decimal)
    }

    pub fn cumulative_precip(&self) -> Option<f64> {
        self.total_precip.total()
    }

    pub fn finish(&self, station_id: String, year: i32) -> YearlySummary {
        YearlySummary {
            station_id,
            year,
            avg_max_temp: self.avg_max_temp(),
            avg_min_temp: self.avg_min_temp(),
            cumulative_precip: self.cumulative_precip(),
        }
    }
}

/// Group observations by (station, calendar year) and aggregate each group.
/// The result is ordered by station then year.
pub fn aggregate(observations: &[DailyObservation]) -> Vec<YearlySummary> {
    let mut groups: BTreeMap<(&str, i32), YearAccumulator> = BTreeMap::new();

    for observation in observations {
        groups
            .entry((observation.station_id.as_str(), observation.date.year()))
            .or_default()
            .push(observation);
    }

    groups
        .into_iter()
        .map(|((station_id, year), acc)| acc.finish(station_id.to_string(), year))
        .collect()
}

/// Recomputes `station_summary` from the full contents of `station_data`.
pub struct Summarizer {
    chunk_size: usize,
}

impl Summarizer {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Aggregate every station-year and upsert the results. Every existing
    /// summary row for a station-year still present in the daily table is
    /// overwritten. Returns the number of rows touched.
    pub fn summarize(&self, store: &mut Store) -> Result<usize> {
        validate_chunk_size(self.chunk_size, STATION_SUMMARY_COLUMNS)?;

        let observations = store.daily_observations()?;
        let summaries = aggregate(&observations);
        info!(
            observations = observations.len(),
            station_years = summaries.len(),
            "Aggregated daily observations"
        );

        let mut touched = 0;
        for (offset, batch) in chunked(&summaries, self.chunk_size)? {
            let rows = store
                .upsert_summaries(batch)
                .map_err(|source| ProcessingError::BatchMerge {
                    table: STATION_SUMMARY_TABLE,
                    offset,
                    source,
                })?;
            debug!(offset, batch_len = batch.len(), rows, "Merged summary batch");
            touched += rows;
        }

        Ok(touched)
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}
