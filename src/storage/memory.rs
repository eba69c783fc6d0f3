//! In-memory storage backend for testing.
//!
//! Provides [`InMemoryStorage`], a thread-safe in-memory implementation of
//! [`Storage`](super::Storage). Ideal for unit and integration tests where
//! file I/O is undesirable.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Deserialize;
use serde_json::Value;

use super::{Record, check_records};
use crate::error::{Result, ThemeParkError};
use crate::identity::IdCounters;
use crate::models::Category;
use crate::pricing::DiscountTable;

/// Thread-safe in-memory storage for testing.
///
/// Collections are kept in their serialized form, so loads hand out
/// independent copies just like [`super::FileStorage`] does.
///
/// # Example
///
/// ```rust
/// use themepark_rs::storage::InMemoryStorage;
/// use themepark_rs::theme_park::ThemePark;
///
/// let park = ThemePark::builder()
///     .storage(InMemoryStorage::new())
///     .build()
///     .unwrap();
/// assert!(park.get_all_guests().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    /// All state behind a single mutex for thread-safe interior mutability.
    inner: Mutex<Inner>,
}

/// Inner mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// Serialized collection per category.
    collections: HashMap<Category, Value>,
    /// Identifier counters.
    counters: IdCounters,
    /// Ticket defaults, once saved.
    discounts: Option<DiscountTable>,
}

impl Inner {
    /// Decodes and checks the collection for `R`.
    fn records<R: Record>(&self) -> Result<Vec<R>> {
        let Some(value) = self.collections.get(&R::CATEGORY) else {
            return Ok(Vec::new());
        };
        let records = Vec::<R>::deserialize(value)?;
        check_records(&records)?;
        Ok(records)
    }

    /// Encodes and stores the collection for `R`.
    fn store<R: Record>(&mut self, records: &[R]) -> Result<()> {
        let value = serde_json::to_value(records)?;
        let _old = self.collections.insert(R::CATEGORY, value);
        Ok(())
    }
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<T, F: FnOnce(&mut Inner) -> Result<T>>(&self, op: F) -> Result<T> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        op(&mut inner)
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> ThemeParkError {
    ThemeParkError::Storage(err.to_string().into())
}

// ── Storage implementation ──────────────────────────────────────────────

impl super::Storage for InMemoryStorage {
    #[inline]
    fn load<R: Record>(&self) -> Result<Vec<R>> {
        self.with_lock(|inner| inner.records())
    }

    #[inline]
    fn save<R: Record>(&self, records: &[R]) -> Result<()> {
        self.with_lock(|inner| inner.store(records))
    }

    #[inline]
    fn modify<R, T, F>(&self, op: F) -> Result<T>
    where
        R: Record,
        F: FnOnce(&mut Vec<R>) -> Result<T>,
    {
        self.with_lock(|inner| {
            let mut records = inner.records()?;
            let output = op(&mut records)?;
            inner.store(&records)?;
            Ok(output)
        })
    }

    #[inline]
    fn next_id(&self, category: &str) -> Result<u64> {
        self.with_lock(|inner| inner.counters.next_id(category))
    }

    #[inline]
    fn load_discounts(&self) -> Result<Option<DiscountTable>> {
        self.with_lock(|inner| Ok(inner.discounts.clone()))
    }

    #[inline]
    fn save_discounts(&self, table: &DiscountTable) -> Result<()> {
        self.with_lock(|inner| {
            inner.discounts = Some(table.clone());
            Ok(())
        })
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_lock(|inner| {
            *inner = Inner::default();
            Ok(())
        })
    }
}
