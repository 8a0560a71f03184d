pub mod ingest;
pub mod summarize;

pub use ingest::{FailedFile, IngestReport, Ingestor, SkippedFile};
pub use summarize::{aggregate, Summarizer, YearAccumulator};
