use super::Row;
use std::sync::{Mutex, PoisonError};

/// Collects rows produced concurrently by per-project tasks.
///
/// The lock is only held while appending, never across a network call. Rows
/// come out in completion order, which callers must not rely on.
#[derive(Debug, Default)]
pub struct RowAggregator {
    rows: Mutex<Vec<Row>>,
}

impl RowAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, row: Row) {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).push(row);
    }

    /// Remove and return everything collected so far.
    ///
    /// Call once every producer has finished to obtain the complete set.
    #[must_use]
    pub fn take(&self) -> Vec<Row> {
        core::mem::take(&mut *self.rows.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
