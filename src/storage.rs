//! Pluggable storage backends for park records.
//!
//! Every entity category is persisted as one ordered collection. The
//! [`Storage`] trait reads and overwrites whole collections, runs locked
//! read-modify-write cycles, and issues identifiers through the
//! [`IdCounters`](crate::identity::IdCounters) it keeps alongside the data.

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileStorage;
pub use memory::InMemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, ThemeParkError};
use crate::models::{
    Admin, Attraction, Category, Event, Guest, Payment, Reservation, Service, Ticket,
};
use crate::pricing::DiscountTable;

/// An entity that is persisted as part of a category collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Collection this record belongs to.
    const CATEGORY: Category;

    /// Returns the record's raw identifier.
    fn record_id(&self) -> u64;

    /// Checks invariants that decoding alone does not enforce.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] describing the first broken
    /// invariant.
    #[inline]
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Implements [`Record`] for a model with an `id()` accessor, optionally
/// wiring [`Record::check`] to a validation method.
macro_rules! impl_record {
    ($($ty:ty => $category:ident $(with $check:path)?),* $(,)?) => {
        $(
            impl Record for $ty {
                const CATEGORY: Category = Category::$category;

                #[inline]
                fn record_id(&self) -> u64 {
                    self.id().into_inner()
                }

                $(
                    #[inline]
                    fn check(&self) -> Result<()> {
                        $check(self)
                    }
                )?
            }
        )*
    };
}

impl_record! {
    Guest => Guest,
    Ticket => Ticket with Ticket::check_invariants,
    Reservation => Reservation,
    Admin => Admin,
    Payment => Payment with Payment::check_invariants,
    Attraction => Attraction,
    Event => Event,
    Service => Service,
}

/// Checks every record of a freshly decoded collection.
///
/// The error names the offending record.
fn check_records<R: Record>(records: &[R]) -> Result<()> {
    records.iter().try_for_each(|record| {
        record.check().map_err(|err| {
            ThemeParkError::validation(format!(
                "{} {}: {err}",
                R::CATEGORY,
                record.record_id()
            ))
        })
    })
}

/// Storage backend for park records.
///
/// All methods take `&self`; implementations use interior mutability
/// (e.g. `Mutex`) for thread-safe mutation.
pub trait Storage: core::fmt::Debug + Send + Sync {
    /// Returns the full collection for `R`, in stored order.
    ///
    /// A collection that was never saved is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn load<R: Record>(&self) -> Result<Vec<R>>;

    /// Overwrites the collection for `R` with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn save<R: Record>(&self, records: &[R]) -> Result<()>;

    /// Loads the collection for `R`, applies `op` and saves the result,
    /// all under one exclusive lock.
    ///
    /// Nothing is written if `op` fails.
    ///
    /// # Errors
    ///
    /// Returns the error of `op`, or an error if the backend fails.
    fn modify<R, T, F>(&self, op: F) -> Result<T>
    where
        R: Record,
        F: FnOnce(&mut Vec<R>) -> Result<T>;

    /// Appends `record` to the `category` collection.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::KindMismatch`] if `record` does not belong
    /// to `category`, or an error if the backend fails.
    #[inline]
    fn add<R: Record>(&self, category: Category, record: R) -> Result<()> {
        if R::CATEGORY != category {
            return Err(ThemeParkError::KindMismatch {
                expected: category,
                found: R::CATEGORY,
            });
        }
        self.modify(|records: &mut Vec<R>| {
            records.push(record);
            Ok(())
        })
    }

    /// Returns the persisted ticket defaults, or `None` if none were saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read, or if the stored
    /// table cannot be decoded or holds an out-of-range price or discount.
    fn load_discounts(&self) -> Result<Option<DiscountTable>>;

    /// Persists the ticket defaults, replacing any saved table.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn save_discounts(&self, table: &DiscountTable) -> Result<()>;

    /// Issues the next identifier for `category` and persists the counter
    /// before returning it.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::UnknownCategory`] if no counter is
    /// registered under `category`, or an error if the backend fails.
    fn next_id(&self, category: &str) -> Result<u64>;

    /// Removes all stored collections, the counters and the ticket defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn clear(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GuestId, TicketId, TicketType};

    #[test]
    fn record_categories() {
        assert_eq!(Guest::CATEGORY, Category::Guest);
        assert_eq!(Reservation::CATEGORY, Category::Reservation);
        assert_eq!(Service::CATEGORY, Category::Service);
    }

    #[test]
    fn record_id_reads_inner_value() {
        let guest = Guest::new(GuestId::new(5), "Ali", "ali@example.com", "1").unwrap();
        assert_eq!(guest.record_id(), 5);
        let ticket = Ticket::new(TicketId::new(8), TicketType::Vip, 550.0, 1, None).unwrap();
        assert_eq!(ticket.record_id(), 8);
    }

    #[test]
    fn add_rejects_mismatched_category() {
        let storage = InMemoryStorage::new();
        let guest = Guest::new(GuestId::new(1), "Ali", "ali@example.com", "1").unwrap();
        let err = storage.add(Category::Ticket, guest).unwrap_err();
        assert!(matches!(
            err,
            ThemeParkError::KindMismatch {
                expected: Category::Ticket,
                found: Category::Guest,
            }
        ));
        assert!(storage.load::<Guest>().unwrap().is_empty());
    }

    #[test]
    fn check_records_names_the_broken_record() {
        let good = Ticket::new(TicketId::new(1), TicketType::Vip, 550.0, 1, None).unwrap();
        let mut json = serde_json::to_value(&good).unwrap();
        json["id"] = serde_json::json!(2);
        json["discount"] = serde_json::json!(150.0);
        let bad: Ticket = serde_json::from_value(json).unwrap();

        assert!(check_records(core::slice::from_ref(&good)).is_ok());
        let err = check_records(&[good, bad]).unwrap_err();
        assert!(matches!(err, ThemeParkError::Validation(_)));
        assert!(err.to_string().contains("ticket 2"));
    }
}
