//! Helpers for working within SQLite's statement limits.

/// Bound parameters allowed per statement.
///
/// SQLite's compile-time limit (SQLITE_MAX_VARIABLE_NUMBER) is 999 on older
/// builds; 500 stays well under it.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits rows for a multi-row `INSERT` so each statement binds at most
/// `SQLITE_MAX_PARAMS_CHUNK` parameters.
pub fn chunk_rows_for_insert<T>(rows: &[T], columns_per_row: usize) -> impl Iterator<Item = &[T]> {
    let rows_per_chunk = (SQLITE_MAX_PARAMS_CHUNK / columns_per_row.max(1)).max(1);
    rows.chunks(rows_per_chunk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_rows_empty() {
        let rows: Vec<i32> = vec![];
        assert_eq!(chunk_rows_for_insert(&rows, 3).count(), 0);
    }

    #[test]
    fn test_chunk_rows_respects_parameter_budget() {
        let rows: Vec<i32> = (0..400).collect();
        let chunks: Vec<_> = chunk_rows_for_insert(&rows, 3).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 166); // 498 parameters
        assert_eq!(chunks[2].len(), 400 - 2 * 166);
    }

    #[test]
    fn test_chunk_rows_wide_rows_still_progress() {
        let rows: Vec<i32> = (0..3).collect();
        let chunks: Vec<_> = chunk_rows_for_insert(&rows, 10_000).collect();
        assert_eq!(chunks.len(), 3);
    }
}
