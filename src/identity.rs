//! Per-category identifier counters.
//!
//! [`IdCounters`] maps a category name to the next identifier to issue.
//! Storage backends keep one instance next to the data and persist it
//! after every issuance, so identifiers are never reused across restarts.

use alloc::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeParkError};
use crate::models::Category;

/// First identifier issued for a freshly registered category.
const FIRST_ID: u64 = 1;

/// Next identifier to issue, keyed by category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdCounters {
    /// Category name to next identifier.
    next: BTreeMap<String, u64>,
}

impl Default for IdCounters {
    /// Registers every built-in category at 1.
    #[inline]
    fn default() -> Self {
        let mut counters = Self::empty();
        let _added = counters.register_builtin();
        counters
    }
}

impl IdCounters {
    /// Creates a counter map with no categories registered.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            next: BTreeMap::new(),
        }
    }

    /// Registers `category` at 1 unless it is already present.
    ///
    /// Returns `true` if the category was added.
    #[inline]
    pub fn register(&mut self, category: &str) -> bool {
        if self.next.contains_key(category) {
            return false;
        }
        let _old = self.next.insert(category.to_owned(), FIRST_ID);
        true
    }

    /// Registers every built-in [`Category`] that is missing.
    ///
    /// Returns `true` if any category was added.
    #[inline]
    pub fn register_builtin(&mut self) -> bool {
        Category::ALL
            .into_iter()
            .fold(false, |added, category| {
                self.register(category.as_str()) || added
            })
    }

    /// Returns the identifier the next call to [`next_id`](Self::next_id)
    /// would issue, without consuming it.
    #[inline]
    #[must_use]
    pub fn peek(&self, category: &str) -> Option<u64> {
        self.next.get(category).copied()
    }

    /// Issues the next identifier for `category` and advances its counter.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::UnknownCategory`] if `category` was never
    /// registered, or [`ThemeParkError::Validation`] if its counter is
    /// exhausted.
    pub fn next_id(&mut self, category: &str) -> Result<u64> {
        let counter = self
            .next
            .get_mut(category)
            .ok_or_else(|| ThemeParkError::UnknownCategory(category.to_owned()))?;
        let issued = (*counter).max(FIRST_ID);
        *counter = issued.checked_add(1).ok_or_else(|| {
            ThemeParkError::validation(format!("identifier space exhausted for {category}"))
        })?;
        Ok(issued)
    }
}
