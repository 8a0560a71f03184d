use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Malformed record in {} at line {line}: {message}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Merge into {table} failed for batch at offset {offset}: {source}")]
    BatchMerge {
        table: &'static str,
        offset: usize,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProcessingError {
    /// True when the error is confined to a single input file and the run
    /// may continue with the next one.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            ProcessingError::MalformedRecord { .. }
                | ProcessingError::InvalidFormat(_)
                | ProcessingError::Io(_)
        )
    }
}
