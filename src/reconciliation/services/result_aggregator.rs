use std::sync::{Mutex, PoisonError};

/// Append-only result list shared by concurrent reconciliation tasks
///
/// Each task pushes the outcome of the one component it owns; entries are
/// never modified or removed once pushed.
#[derive(Debug)]
pub struct ResultAggregator<T> {
    entries: Mutex<Vec<T>>,
}

impl<T> ResultAggregator<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, entry: T) {
        // A panicking writer cannot leave a half-pushed entry behind.
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_inner(self) -> Vec<T> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for ResultAggregator<T> {
    fn default() -> Self {
        Self::new()
    }
}
