use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use station_loader::models::{StationDataRow, StationSummaryRow};
use station_loader::processors::{Ingestor, Summarizer};
use station_loader::store::{StationDataQuery, Store, SummaryQuery};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Two stations with three January 1985 days each. USC00123456 is missing one
/// precipitation value, USC00331541 one minimum temperature.
fn write_station_files(dir: &Path) {
    fs::write(
        dir.join("USC00331541.txt"),
        "19850101\t1\t0\t1\n19850102\t2\t-2\t4\n19850103\t0\t-9999\t1\n",
    )
    .unwrap();
    fs::write(
        dir.join("USC00123456.txt"),
        "19850101\t0\t-1\t2\n19850102\t0\t-2\t2\n19850103\t0\t-3\t-9999\n",
    )
    .unwrap();
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(1985, 1, d).unwrap()
}

fn all_rows(store: &Store) -> Vec<StationDataRow> {
    store
        .list_station_data(&StationDataQuery::default().with_page(100, 0))
        .unwrap()
}

fn row(
    id: i64,
    station: &str,
    d: u32,
    max: Option<f64>,
    min: Option<f64>,
    precip: Option<f64>,
) -> StationDataRow {
    StationDataRow {
        id,
        station_id: station.to_string(),
        date: day(d),
        max_temp: max,
        min_temp: min,
        total_precip: precip,
    }
}

#[test]
fn test_ingest_then_summarize_end_to_end() {
    let data_dir = TempDir::new().unwrap();
    write_station_files(data_dir.path());
    let db_dir = TempDir::new().unwrap();
    let mut store = Store::open_initialized(&db_dir.path().join("weather.db")).unwrap();

    let report = Ingestor::new()
        .ingest_directory(&mut store, data_dir.path(), None)
        .unwrap();
    assert_eq!(report.files_loaded, 2);
    assert_eq!(report.rows_touched, 6);

    assert_eq!(
        all_rows(&store),
        vec![
            row(1, "USC00123456", 1, Some(0.0), Some(-1.0), Some(2.0)),
            row(2, "USC00123456", 2, Some(0.0), Some(-2.0), Some(2.0)),
            row(3, "USC00123456", 3, Some(0.0), Some(-3.0), None),
            row(4, "USC00331541", 1, Some(1.0), Some(0.0), Some(1.0)),
            row(5, "USC00331541", 2, Some(2.0), Some(-2.0), Some(4.0)),
            row(6, "USC00331541", 3, Some(0.0), None, Some(1.0)),
        ]
    );

    let touched = Summarizer::new().summarize(&mut store).unwrap();
    assert_eq!(touched, 2);

    let summaries = store
        .list_station_summaries(&SummaryQuery::default())
        .unwrap();
    assert_eq!(
        summaries,
        vec![
            StationSummaryRow {
                id: 1,
                station_id: "USC00123456".to_string(),
                year: 1985,
                avg_max_temp: Some(0.0),
                avg_min_temp: Some(-2.0),
                cumulative_precip: Some(4.0),
            },
            StationSummaryRow {
                id: 2,
                station_id: "USC00331541".to_string(),
                year: 1985,
                avg_max_temp: Some(1.0),
                avg_min_temp: Some(-1.0),
                cumulative_precip: Some(6.0),
            },
        ]
    );
}

#[test]
fn test_reingest_is_idempotent() {
    let data_dir = TempDir::new().unwrap();
    write_station_files(data_dir.path());
    let mut store = Store::open_in_memory().unwrap();
    store.init_schema().unwrap();

    let ingestor = Ingestor::new().with_chunk_size(2);
    let first = ingestor
        .ingest_directory(&mut store, data_dir.path(), None)
        .unwrap();
    let rows_after_first = all_rows(&store);

    let second = ingestor
        .ingest_directory(&mut store, data_dir.path(), None)
        .unwrap();

    assert_eq!(first.rows_touched, 6);
    assert_eq!(second.rows_touched, 6);
    assert_eq!(all_rows(&store), rows_after_first);
}

#[test]
fn test_sentinel_never_stored() {
    let data_dir = TempDir::new().unwrap();
    fs::write(
        data_dir.path().join("USC00000001.txt"),
        "19850101 -9999 -9999 -9999\n19850102 -9999 5 -9999\n",
    )
    .unwrap();
    let mut store = Store::open_in_memory().unwrap();
    store.init_schema().unwrap();

    Ingestor::new()
        .ingest_directory(&mut store, data_dir.path(), None)
        .unwrap();

    let sentinel_rows: i64 = store
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM station_data
             WHERE max_temp = -9999 OR min_temp = -9999 OR total_precip = -9999",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(sentinel_rows, 0);

    Summarizer::new().summarize(&mut store).unwrap();
    let summary = &store
        .list_station_summaries(&SummaryQuery::default())
        .unwrap()[0];
    assert_eq!(summary.avg_max_temp, None);
    assert_eq!(summary.avg_min_temp, Some(5.0));
    assert_eq!(summary.cumulative_precip, None);
}

#[test]
fn test_corrected_file_overwrites_previous_values() {
    let data_dir = TempDir::new().unwrap();
    write_station_files(data_dir.path());
    let mut store = Store::open_in_memory().unwrap();
    store.init_schema().unwrap();

    let ingestor = Ingestor::new();
    ingestor
        .ingest_directory(&mut store, data_dir.path(), None)
        .unwrap();
    Summarizer::new().summarize(&mut store).unwrap();

    // Correct the missing day and add a new year
    fs::write(
        data_dir.path().join("USC00123456.txt"),
        "19850103\t0\t-3\t6\n19860101\t4\t2\t0\n",
    )
    .unwrap();
    ingestor
        .ingest_directory(&mut store, data_dir.path(), None)
        .unwrap();
    Summarizer::new().summarize(&mut store).unwrap();

    assert_eq!(store.count_station_data().unwrap(), 7);
    let corrected = store
        .list_station_data(
            &StationDataQuery::default()
                .with_station("USC00123456")
                .with_date(day(3)),
        )
        .unwrap();
    assert_eq!(corrected.len(), 1);
    assert_eq!(corrected[0].id, 3);
    assert_eq!(corrected[0].total_precip, Some(6.0));

    let summaries = store
        .list_station_summaries(&SummaryQuery::default().with_station("USC00123456"))
        .unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, 1);
    assert_eq!(summaries[0].cumulative_precip, Some(10.0));
    assert_eq!(summaries[1].year, 1986);
    assert_eq!(summaries[1].cumulative_precip, Some(0.0));
}
