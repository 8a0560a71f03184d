use crate::error::{ProcessingError, Result};
use crate::models::DailyObservation;
use crate::readers::{discover_files, DiscoveredFile, ObservationReader};
use crate::store::Store;
use crate::utils::chunks::{chunked, validate_chunk_size};
use crate::utils::constants::{DEFAULT_CHUNK_SIZE, STATION_DATA_COLUMNS, STATION_DATA_TABLE};
use crate::utils::progress::ProgressReporter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of loading a directory of station files.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub files_loaded: usize,
    pub records_read: usize,
    pub rows_touched: usize,
    pub files_skipped: Vec<SkippedFile>,
    pub files_failed: Vec<FailedFile>,
}

impl IngestReport {
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Ingestion Report ===\n");
        summary.push_str(&format!("Files Loaded: {}\n", self.files_loaded));
        summary.push_str(&format!("Records Read: {}\n", self.records_read));
        summary.push_str(&format!("Rows Touched: {}\n", self.rows_touched));
        summary.push_str(&format!("Files Skipped: {}\n", self.files_skipped.len()));
        for skipped in &self.files_skipped {
            summary.push_str(&format!(
                "  - {}: {}\n",
                skipped.path.display(),
                skipped.reason
            ));
        }
        summary.push_str(&format!("Files Failed: {}\n", self.files_failed.len()));
        for failed in &self.files_failed {
            summary.push_str(&format!("  - {}: {}\n", failed.path.display(), failed.error));
        }

        summary
    }
}

/// Merges station observations into `station_data` in fixed-size batches.
pub struct Ingestor {
    chunk_size: usize,
    reader: ObservationReader,
}

impl Ingestor {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            reader: ObservationReader::new(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Upsert `records` keyed on (station_id, date), one transaction per batch.
    ///
    /// Batches committed before a failure stay committed. Returns the number of
    /// rows touched, which counts updates as well as inserts.
    pub fn ingest_records(&self, store: &mut Store, records: &[DailyObservation]) -> Result<usize> {
        validate_chunk_size(self.chunk_size, STATION_DATA_COLUMNS)?;

        let mut touched = 0;
        for (offset, batch) in chunked(records, self.chunk_size)? {
            let rows = store
                .upsert_observations(batch)
                .map_err(|source| ProcessingError::BatchMerge {
                    table: STATION_DATA_TABLE,
                    offset,
                    source,
                })?;
            debug!(offset, batch_len = batch.len(), rows, "Merged observation batch");
            touched += rows;
        }

        Ok(touched)
    }

    /// Load every recognized station file in `dir`.
    ///
    /// A file that cannot be read or parsed is reported and left out; the run
    /// moves on to the next file. Store failures abort the run.
    pub fn ingest_directory(
        &self,
        store: &mut Store,
        dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<IngestReport> {
        validate_chunk_size(self.chunk_size, STATION_DATA_COLUMNS)?;

        let files = discover_files(dir)?;
        info!(dir = %dir.display(), files = files.len(), "Starting ingestion");
        if let Some(p) = progress {
            p.set_length(files.len() as u64);
        }

        let mut report = IngestReport::default();

        for file in files {
            if let Some(p) = progress {
                p.set_message(&format!("Loading {}", file.path().display()));
            }

            match file {
                DiscoveredFile::Skipped { path, reason } => {
                    warn!(path = %path.display(), %reason, "Skipping file");
                    report.files_skipped.push(SkippedFile { path, reason });
                }
                DiscoveredFile::Station(path) => match self.reader.read_observations(&path) {
                    Ok(records) => {
                        let touched = self.ingest_records(store, &records)?;
                        info!(
                            path = %path.display(),
                            records = records.len(),
                            touched,
                            "Loaded station file"
                        );
                        report.files_loaded += 1;
                        report.records_read += records.len();
                        report.rows_touched += touched;
                    }
                    Err(e) if e.is_file_scoped() => {
                        warn!(path = %path.display(), error = %e, "Station file rejected");
                        report.files_failed.push(FailedFile {
                            path,
                            error: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                },
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        info!(
            loaded = report.files_loaded,
            skipped = report.files_skipped.len(),
            failed = report.files_failed.len(),
            touched = report.rows_touched,
            "Finished ingestion"
        );

        Ok(report)
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.init_schema().unwrap();
        store
    }

    fn observations(count: u32) -> Vec<DailyObservation> {
        let start = NaiveDate::from_ymd_opt(1985, 1, 1).unwrap();
        (0..count)
            .map(|i| {
                DailyObservation::new(
                    "USC00110072".to_string(),
                    start + chrono::Duration::days(i as i64),
                    Some(i as f64),
                    None,
                    Some(0.5),
                )
            })
            .collect()
    }

    #[test]
    fn test_ingest_records_across_batches() {
        let mut store = store();
        let records = observations(10);

        let touched = Ingestor::new()
            .with_chunk_size(3)
            .ingest_records(&mut store, &records)
            .unwrap();

        assert_eq!(touched, 10);
        assert_eq!(store.count_station_data().unwrap(), 10);
    }

    #[test]
    fn test_ingest_records_is_idempotent() {
        let mut store = store();
        let records = observations(5);
        let ingestor = Ingestor::new().with_chunk_size(2);

        assert_eq!(ingestor.ingest_records(&mut store, &records).unwrap(), 5);
        let first = store.daily_observations().unwrap();

        // Second run still reports every row as touched
        assert_eq!(ingestor.ingest_records(&mut store, &records).unwrap(), 5);
        assert_eq!(store.count_station_data().unwrap(), 5);
        assert_eq!(store.daily_observations().unwrap(), first);
    }

    #[test]
    fn test_invalid_chunk_size_rejected_before_writing() {
        let mut store = store();
        let records = observations(3);

        assert!(matches!(
            Ingestor::new().with_chunk_size(0).ingest_records(&mut store, &records),
            Err(ProcessingError::Config(_))
        ));
        assert!(Ingestor::new()
            .with_chunk_size(10_000)
            .ingest_records(&mut store, &records)
            .is_err());
        assert_eq!(store.count_station_data().unwrap(), 0);
    }

    #[test]
    fn test_store_failure_reports_batch_offset() {
        let mut store = store();
        store
            .connection()
            .execute_batch("DROP TABLE station_data")
            .unwrap();

        let err = Ingestor::new()
            .with_chunk_size(2)
            .ingest_records(&mut store, &observations(3))
            .unwrap_err();

        assert!(matches!(
            err,
            ProcessingError::BatchMerge {
                table: "station_data",
                offset: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_failed_batch_keeps_earlier_batches_committed() {
        let mut store = store();
        store
            .connection()
            .execute_batch(
                "CREATE TRIGGER reject_station BEFORE INSERT ON station_data
                 WHEN NEW.station_id = 'REJECTED'
                 BEGIN SELECT RAISE(ABORT, 'station rejected'); END;",
            )
            .unwrap();

        let mut records = observations(4);
        records[3].station_id = "REJECTED".to_string();

        let err = Ingestor::new()
            .with_chunk_size(2)
            .ingest_records(&mut store, &records)
            .unwrap_err();

        assert!(matches!(
            err,
            ProcessingError::BatchMerge {
                table: "station_data",
                offset: 2,
                ..
            }
        ));
        // First batch committed, the whole second batch rolled back
        assert_eq!(store.count_station_data().unwrap(), 2);
        assert_eq!(store.daily_observations().unwrap(), records[..2].to_vec());
    }

    #[test]
    fn test_ingest_directory_isolates_bad_files() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("GOOD0001.txt"), "19850101 1 0 1\n19850102 2 -2 4\n")?;
        fs::write(dir.path().join("BAD00002.txt"), "19850101 1 0 1\n1985XX02 2 -2 4\n")?;
        fs::write(dir.path().join("stations.json"), "{}")?;

        let mut store = store();
        let report = Ingestor::new().ingest_directory(&mut store, dir.path(), None)?;

        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.records_read, 2);
        assert_eq!(report.rows_touched, 2);
        assert_eq!(report.files_skipped.len(), 1);
        assert_eq!(report.files_failed.len(), 1);
        assert!(report.files_failed[0].path.ends_with("BAD00002.txt"));

        // Nothing from the rejected file reaches the table
        assert_eq!(store.count_station_data()?, 2);
        assert!(store
            .daily_observations()?
            .iter()
            .all(|o| o.station_id == "GOOD0001"));

        let text = report.summary();
        assert!(text.contains("Files Loaded: 1"));
        assert!(text.contains("stations.json"));

        Ok(())
    }
}
