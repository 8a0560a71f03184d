use crate::error::{ProcessingError, Result};
use crate::models::DailyObservation;
use crate::readers::discovery::station_id_from_path;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, OBSERVATION_COLUMNS};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use validator::Validate;

/// Reads whitespace-separated station files with the columns
/// `date max_temp min_temp total_precip` and no header row.
pub struct ObservationReader {
    buffer_size: usize,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Read every observation in a station file. The station ID comes from the file name.
    ///
    /// Any malformed row rejects the whole file.
    pub fn read_observations(&self, path: &Path) -> Result<Vec<DailyObservation>> {
        let station_id = station_id_from_path(path)?;
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(self.buffer_size, file);
        self.read_from(reader, &station_id)
            .map_err(|e| with_path(e, path))
    }

    /// Read observations for `station_id` from any buffered source.
    pub fn read_from<R: Read>(
        &self,
        reader: BufReader<R>,
        station_id: &str,
    ) -> Result<Vec<DailyObservation>> {
        let mut records = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line_number = index + 1;

            if line.trim().is_empty() {
                continue;
            }

            let record = self
                .parse_line(&line, station_id)
                .map_err(|message| ProcessingError::MalformedRecord {
                    path: station_id.into(),
                    line: line_number,
                    message,
                })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse one data row. Sentinel values become `None` before anything else sees them.
    pub fn parse_line(
        &self,
        line: &str,
        station_id: &str,
    ) -> std::result::Result<DailyObservation, String> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != OBSERVATION_COLUMNS.len() {
            return Err(format!(
                "expected {} columns ({}), found {}: '{}'",
                OBSERVATION_COLUMNS.len(),
                OBSERVATION_COLUMNS.join(", "),
                parts.len(),
                line.trim()
            ));
        }

        let date = parse_date(parts[0])?;
        let max_temp = parse_value(parts[1], OBSERVATION_COLUMNS[1])?;
        let min_temp = parse_value(parts[2], OBSERVATION_COLUMNS[2])?;
        let total_precip = parse_value(parts[3], OBSERVATION_COLUMNS[3])?;

        let record = DailyObservation::from_raw(
            station_id.to_string(),
            date,
            max_temp,
            min_temp,
            total_precip,
        );
        record
            .validate()
            .map_err(|e| format!("invalid station ID '{}': {}", station_id, e))?;

        Ok(record)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `YYYYMMDD`, falling back to ISO `YYYY-MM-DD`.
fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    let compact = if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
    } else {
        None
    };

    compact
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .ok_or_else(|| format!("invalid date '{}'", raw))
}

fn parse_value(raw: &str, column: &str) -> std::result::Result<f64, String> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid {} value '{}'", column, raw))
}

fn with_path(error: ProcessingError, path: &Path) -> ProcessingError {
    match error {
        ProcessingError::MalformedRecord { line, message, .. } => {
            ProcessingError::MalformedRecord {
                path: path.to_path_buf(),
                line,
                message,
            }
        }
        other => other,
    }
}
