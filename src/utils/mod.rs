pub mod chunks;
pub mod constants;
pub mod progress;

pub use chunks::{chunked, validate_chunk_size};
pub use constants::*;
pub use progress::ProgressReporter;
