use crate::error::{ProcessingError, Result};
use crate::utils::constants::MAX_BOUND_PARAMETERS;

/// Check that `chunk_size` rows of `columns` bound parameters each fit in a
/// single statement.
pub fn validate_chunk_size(chunk_size: usize, columns: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(ProcessingError::Config(
            "Chunk size must be at least 1".to_string(),
        ));
    }

    let parameters = chunk_size.saturating_mul(columns);
    if parameters > MAX_BOUND_PARAMETERS {
        return Err(ProcessingError::Config(format!(
            "Chunk size {} needs {} bound parameters per statement, limit is {}",
            chunk_size, parameters, MAX_BOUND_PARAMETERS
        )));
    }

    Ok(())
}

/// Split `items` into consecutive batches of at most `chunk_size` elements.
///
/// Each batch is paired with the offset of its first element so callers can
/// report where a failing batch started.
pub fn chunked<T>(items: &[T], chunk_size: usize) -> Result<impl Iterator<Item = (usize, &[T])>> {
    if chunk_size == 0 {
        return Err(ProcessingError::Config(
            "Chunk size must be at least 1".to_string(),
        ));
    }

    Ok(items
        .chunks(chunk_size)
        .enumerate()
        .map(move |(i, chunk)| (i * chunk_size, chunk)))
}
