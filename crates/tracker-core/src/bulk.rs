//! # Bulk Import Accumulator
//!
//! A best-effort batch: every item is attempted, successes and failures are
//! collected in input order, and nothing already added is rolled back when
//! a later item fails.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One failed bulk import item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkFailure {
    /// Name of the item that failed (falls back to its username).
    pub employee: String,
    /// Why it failed.
    pub error: String,
}

/// Outcome of a bulk import: the records created and the items that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkImport<T> {
    added: Vec<T>,
    errors: Vec<BulkFailure>,
}

impl<T> BulkImport<T> {
    /// An empty result.
    pub fn new() -> Self {
        Self {
            added: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Fold one item's outcome into the result.
    pub fn record<E: std::fmt::Display>(
        mut self,
        label: impl Into<String>,
        outcome: Result<T, E>,
    ) -> Self {
        match outcome {
            Ok(created) => self.added.push(created),
            Err(err) => self.errors.push(BulkFailure {
                employee: label.into(),
                error: err.to_string(),
            }),
        }
        self
    }

    /// Records created, in input order.
    pub fn added(&self) -> &[T] {
        &self.added
    }

    /// Items that failed, in input order.
    pub fn errors(&self) -> &[BulkFailure] {
        &self.errors
    }

    /// Number of records created.
    pub fn count(&self) -> usize {
        self.added.len()
    }

    /// Split into the created records and the failures.
    pub fn into_parts(self) -> (Vec<T>, Vec<BulkFailure>) {
        (self.added, self.errors)
    }
}

impl<T> Default for BulkImport<T> {
    fn default() -> Self {
        Self::new()
    }
}
