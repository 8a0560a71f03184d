/// Table names
pub const STATION_DATA_TABLE: &str = "station_data";
pub const STATION_SUMMARY_TABLE: &str = "station_summary";

/// Input files
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["txt", "csv"];
pub const OBSERVATION_COLUMNS: [&str; 4] = ["date", "max_temp", "min_temp", "total_precip"];

/// Value recorded in station files when a measurement is missing
pub const MISSING_VALUE_SENTINEL: f64 = -9999.0;

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 999;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_INSTANCE_DIR: &str = "./db";
pub const DEFAULT_DATABASE: &str = "weather.db";

/// SQLite's default SQLITE_MAX_VARIABLE_NUMBER since 3.32
pub const MAX_BOUND_PARAMETERS: usize = 32766;

/// Bound parameters per row in each merge statement
pub const STATION_DATA_COLUMNS: usize = 5;
pub const STATION_SUMMARY_COLUMNS: usize = 5;

/// Query layer defaults
pub const DEFAULT_QUERY_LIMIT: u32 = 20;
pub const DEFAULT_QUERY_OFFSET: u32 = 0;
