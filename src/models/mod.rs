pub mod observation;
pub mod summary;

pub use observation::{normalize_missing, DailyObservation, StationDataRow};
pub use summary::{round_to_one_decimal, StationSummaryRow, YearlySummary};
