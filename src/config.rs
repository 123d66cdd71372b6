//! Store configuration
//!
//! A `StoreConfig` is handed to `TableStore::new` and fixed for the life of
//! the store.

use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::store::TableStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// When set, an INSERT that would violate a primary-key constraint is
    /// silently dropped (no row added, no error) instead of failing.
    pub ignore_constraint_violations: bool,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_constraint_violations(mut self, ignore: bool) -> Self {
        self.ignore_constraint_violations = ignore;
        self
    }
}
