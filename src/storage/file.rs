//! JSON-file-based storage backend.
//!
//! Stores each category in a separate JSON file under a configurable
//! directory (default: `$XDG_DATA_HOME/themepark-rs/`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use super::{Record, check_records};
use crate::error::{Result, ThemeParkError};
use crate::identity::IdCounters;
use crate::models::Category;
use crate::pricing::DiscountTable;

/// Application name used for the XDG data directory.
const APP_NAME: &str = "themepark-rs";
/// File name for the identifier counters.
const COUNTERS_FILE: &str = "id_counters.json";
/// File name for the per-type ticket defaults.
const DISCOUNTS_FILE: &str = "discounts.json";
/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// File-backed storage that persists park records as JSON files.
///
/// Each category is stored as a JSON array in its own file, and the
/// identifier counters live in `id_counters.json`. The ticket defaults,
/// once changed, are kept in `discounts.json`.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `storage.lock` (using [`std::fs::File::lock`] /
/// [`std::fs::File::lock_shared`]).
///
/// Loads acquire a shared lock, while saves, read-modify-write cycles and
/// identifier issuance acquire an exclusive lock.
///
/// # Damaged files
///
/// A collection file that fails to decode, or that holds a ticket or
/// payment with an out-of-range price or discount, is logged and read as
/// empty; the next save of that category replaces it. [`with_strict_loads`]
/// turns this into a [`ThemeParkError::Corrupt`] error instead.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock          (cross-process lock sentinel)
///   id_counters.json
///   discounts.json        (only after a discount change)
///   guests.json
///   tickets.json
///   reservations.json
///   admins.json
///   payments.json
///   attractions.json
///   events.json
///   services.json
/// ```
///
/// [`with_strict_loads`]: FileStorage::with_strict_loads
#[derive(Debug)]
pub struct FileStorage {
    /// Root directory containing all JSON files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
    /// Fail loads of undecodable files instead of reading them as empty.
    strict_loads: bool,
}

impl FileStorage {
    /// Creates a new file storage rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist. Also
    /// opens (or creates) the `storage.lock` sentinel file used for
    /// cross-process advisory locking.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        tracing::debug!(dir = %dir.display(), "opened file storage");
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
            strict_loads: false,
        })
    }

    /// Makes loads fail with [`ThemeParkError::Corrupt`] when a collection
    /// file cannot be decoded.
    #[inline]
    #[must_use]
    pub const fn with_strict_loads(mut self, strict: bool) -> Self {
        self.strict_loads = strict;
        self
    }

    /// Returns the root directory.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/themepark-rs/` (typically
    /// `~/.local/share/themepark-rs/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                ThemeParkError::Storage("could not determine platform data directory".into())
            })
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the full path for a given file name.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Acquires an in-process mutex guard and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<T, F: FnOnce() -> Result<T>>(&self, op: F) -> Result<T> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // Only surface the unlock error when the operation succeeded;
        // otherwise the original error is more useful.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write) file
    /// lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<T, F: FnOnce() -> Result<T>>(&self, op: F) -> Result<T> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads a file, returning `None` if it does not exist.
    fn read_file(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Atomically writes a serialized JSON file (write-to-tmp then rename).
    fn write_file<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path(name);
        let tmp_path = self.path(&format!("{name}.tmp"));
        let json = serde_json::to_string_pretty(value).map_err(ThemeParkError::from)?;
        fs::write(&tmp_path, json).map_err(storage_io_error)?;
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }

    /// Reads and decodes the collection for `R`.
    ///
    /// Missing files are empty. Undecodable files, and files holding a
    /// record that fails [`Record::check`], are empty too unless strict
    /// loads are enabled.
    fn read_records<R: Record>(&self) -> Result<Vec<R>> {
        let category = R::CATEGORY;
        let Some(contents) = self.read_file(category.file_name())? else {
            return Ok(Vec::new());
        };
        let decoded = serde_json::from_str::<Vec<R>>(&contents)
            .map_err(ThemeParkError::from)
            .and_then(|records| check_records(&records).map(|()| records));
        match decoded {
            Ok(records) => Ok(records),
            Err(source) if self.strict_loads => Err(ThemeParkError::Corrupt {
                category,
                source: Box::new(source),
            }),
            Err(source) => {
                tracing::warn!(%category, error = %source, "collection file is unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Encodes and writes the collection for `R`.
    fn write_records<R: Record>(&self, records: &[R]) -> Result<()> {
        self.write_file(R::CATEGORY.file_name(), records)?;
        tracing::debug!(category = %R::CATEGORY, count = records.len(), "saved collection");
        Ok(())
    }

    /// Reads the counters, registering any missing built-in category.
    fn read_counters(&self) -> Result<IdCounters> {
        let Some(contents) = self.read_file(COUNTERS_FILE)? else {
            return Ok(IdCounters::default());
        };
        let mut counters: IdCounters = serde_json::from_str(&contents)?;
        if counters.register_builtin() {
            tracing::debug!("registered missing built-in id counters");
        }
        Ok(counters)
    }

    /// Reads the ticket defaults, if they were ever saved.
    fn read_discounts(&self) -> Result<Option<DiscountTable>> {
        let Some(contents) = self.read_file(DISCOUNTS_FILE)? else {
            return Ok(None);
        };
        let table: DiscountTable = serde_json::from_str(&contents)?;
        table.check()?;
        Ok(Some(table))
    }

    /// Deletes all collection files, the counters and the ticket defaults.
    ///
    /// The `storage.lock` sentinel is kept.
    fn clear_all(&self) -> Result<()> {
        self.with_exclusive_lock(|| {
            let files = Category::ALL
                .into_iter()
                .map(Category::file_name)
                .chain([COUNTERS_FILE, DISCOUNTS_FILE]);
            for name in files {
                match fs::remove_file(self.path(name)) {
                    Ok(()) => {}
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(err) => return Err(storage_io_error(err)),
                }
            }
            Ok(())
        })
    }
}

// ── Free-standing helpers ───────────────────────────────────────────────

/// Wraps an I/O error into a [`ThemeParkError::Storage`].
fn storage_io_error(err: io::Error) -> ThemeParkError {
    ThemeParkError::Storage(Box::new(err))
}

/// Wraps a mutex poison error into a [`ThemeParkError::Storage`].
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> ThemeParkError {
    ThemeParkError::Storage(err.to_string().into())
}

// ── Storage implementation ──────────────────────────────────────────────

impl super::Storage for FileStorage {
    #[inline]
    fn load<R: Record>(&self) -> Result<Vec<R>> {
        self.with_shared_lock(|| self.read_records())
    }

    #[inline]
    fn save<R: Record>(&self, records: &[R]) -> Result<()> {
        self.with_exclusive_lock(|| self.write_records(records))
    }

    #[inline]
    fn modify<R, T, F>(&self, op: F) -> Result<T>
    where
        R: Record,
        F: FnOnce(&mut Vec<R>) -> Result<T>,
    {
        self.with_exclusive_lock(|| {
            let mut records = self.read_records()?;
            let output = op(&mut records)?;
            self.write_records(&records)?;
            Ok(output)
        })
    }

    #[inline]
    fn next_id(&self, category: &str) -> Result<u64> {
        self.with_exclusive_lock(|| {
            let mut counters = self.read_counters()?;
            let id = counters.next_id(category)?;
            self.write_file(COUNTERS_FILE, &counters)?;
            tracing::debug!(category, id, "issued id");
            Ok(id)
        })
    }

    #[inline]
    fn load_discounts(&self) -> Result<Option<DiscountTable>> {
        self.with_shared_lock(|| self.read_discounts())
    }

    #[inline]
    fn save_discounts(&self, table: &DiscountTable) -> Result<()> {
        self.with_exclusive_lock(|| {
            self.write_file(DISCOUNTS_FILE, table)?;
            tracing::debug!("saved ticket defaults");
            Ok(())
        })
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.clear_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Admin, Guest, GuestId, Payment, PaymentId, PaymentMethod, Reservation, ReservationId,
        Ticket, TicketId, TicketStatus, TicketType,
    };
    use crate::storage::Storage;

    /// Helper to create a [`FileStorage`] in a temporary directory.
    fn temp_storage() -> (FileStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        (storage, dir)
    }

    /// Creates a minimal test guest.
    fn test_guest(id: u64, name: &str) -> Guest {
        Guest::new(
            GuestId::new(id),
            name,
            format!("{}@example.com", name.to_lowercase()),
            "050-000-0000",
        )
        .unwrap()
    }

    #[test]
    fn empty_storage_returns_empty_vecs() {
        let (storage, _dir) = temp_storage();
        assert!(storage.load::<Guest>().unwrap().is_empty());
        assert!(storage.load::<Ticket>().unwrap().is_empty());
        assert!(storage.load::<Reservation>().unwrap().is_empty());
        assert!(storage.load::<Payment>().unwrap().is_empty());
    }

    #[test]
    fn save_and_reload_preserves_fields() {
        let (storage, dir) = temp_storage();
        let guests: Vec<Guest> = (1..=25)
            .map(|id| {
                let mut guest = test_guest(id, &format!("Guest{id}"));
                guest.set_age(Some(20));
                guest.record_purchase(TicketId::new(id * 10));
                guest
            })
            .collect();
        storage.save(&guests).unwrap();
        drop(storage);

        let reopened = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.load::<Guest>().unwrap(), guests);
    }

    #[test]
    fn save_overwrites_collection() {
        let (storage, _dir) = temp_storage();
        storage
            .save(&[test_guest(1, "Hamda"), test_guest(2, "Ali")])
            .unwrap();
        storage.save(&[test_guest(3, "Sara")]).unwrap();

        let guests = storage.load::<Guest>().unwrap();
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].name(), "Sara");
    }

    #[test]
    fn add_appends_in_order() {
        let (storage, _dir) = temp_storage();
        storage.add(Category::Guest, test_guest(1, "Hamda")).unwrap();
        storage.add(Category::Guest, test_guest(2, "Ali")).unwrap();
        let names: Vec<String> = storage
            .load::<Guest>()
            .unwrap()
            .iter()
            .map(|guest| guest.name().to_owned())
            .collect();
        assert_eq!(names, ["Hamda", "Ali"]);
    }

    #[test]
    fn failed_modify_writes_nothing() {
        let (storage, _dir) = temp_storage();
        storage.save(&[test_guest(1, "Hamda")]).unwrap();
        let result = storage.modify(|guests: &mut Vec<Guest>| {
            guests.clear();
            Err::<(), _>(ThemeParkError::validation("rejected"))
        });
        assert!(matches!(result, Err(ThemeParkError::Validation(_))));
        assert_eq!(storage.load::<Guest>().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        let (storage, _dir) = temp_storage();
        fs::write(storage.path("guests.json"), "{not json").unwrap();
        assert!(storage.load::<Guest>().unwrap().is_empty());

        storage.add(Category::Guest, test_guest(1, "Hamda")).unwrap();
        assert_eq!(storage.load::<Guest>().unwrap().len(), 1);
    }

    #[test]
    fn strict_loads_report_corruption() {
        let (storage, _dir) = temp_storage();
        let storage = storage.with_strict_loads(true);
        fs::write(storage.path("tickets.json"), "[{\"id\": \"x\"}]").unwrap();
        let err = storage.load::<Ticket>().unwrap_err();
        assert!(matches!(
            err,
            ThemeParkError::Corrupt {
                category: Category::Ticket,
                ..
            }
        ));
        // A failed strict load must not clobber the file.
        assert!(storage.modify(|_: &mut Vec<Ticket>| Ok(())).is_err());
        let contents = fs::read_to_string(storage.path("tickets.json")).unwrap();
        assert_eq!(contents, "[{\"id\": \"x\"}]");
    }

    #[test]
    fn out_of_range_ticket_discount_is_not_loaded() {
        let (storage, dir) = temp_storage();
        let tickets = r#"[{"id": 2, "ticket_type": "Group", "price": 220.0,
                           "validity_period": 1, "purchase_date": "2024-12-01",
                           "discount": 150.0}]"#;
        fs::write(storage.path("tickets.json"), tickets).unwrap();
        assert!(storage.load::<Ticket>().unwrap().is_empty());

        let strict = FileStorage::new(dir.path().to_path_buf())
            .unwrap()
            .with_strict_loads(true);
        let err = strict.load::<Ticket>().unwrap_err();
        assert!(matches!(
            err,
            ThemeParkError::Corrupt {
                category: Category::Ticket,
                ..
            }
        ));
        assert!(err.to_string().contains("ticket 2"), "{err}");
    }

    #[test]
    fn negative_payment_amount_is_not_loaded() {
        let (storage, _dir) = temp_storage();
        fs::write(
            storage.path("payments.json"),
            r#"[{"id": 1, "amount_paid": -20.0, "date": "2024-12-01", "method": "Debit Card"}]"#,
        )
        .unwrap();
        assert!(storage.load::<Payment>().unwrap().is_empty());
    }

    #[test]
    fn discounts_round_trip_and_clear() {
        let (storage, dir) = temp_storage();
        assert_eq!(storage.load_discounts().unwrap(), None);

        let mut table = DiscountTable::default();
        table.set_discount(TicketType::Vip, 30.0).unwrap();
        storage.save_discounts(&table).unwrap();
        drop(storage);

        let reopened = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.load_discounts().unwrap(), Some(table));

        reopened.clear().unwrap();
        assert_eq!(reopened.load_discounts().unwrap(), None);
    }

    #[test]
    fn invalid_discounts_file_is_an_error() {
        let (storage, _dir) = temp_storage();
        fs::write(storage.path(DISCOUNTS_FILE), "{not json").unwrap();
        assert!(matches!(
            storage.load_discounts(),
            Err(ThemeParkError::Serialization(_))
        ));

        let mut value = serde_json::to_value(DiscountTable::default()).unwrap();
        value["vip"]["discount"] = serde_json::json!(-1.0);
        fs::write(storage.path(DISCOUNTS_FILE), value.to_string()).unwrap();
        assert!(matches!(
            storage.load_discounts(),
            Err(ThemeParkError::Validation(_))
        ));
    }

    #[test]
    fn legacy_records_are_normalized() {
        let (storage, _dir) = temp_storage();
        fs::write(storage.path("guests.json"), r#"[{"id": 1, "name": "Hamda"}]"#).unwrap();
        fs::write(
            storage.path("tickets.json"),
            r#"[{"id": 4, "ticket_type": "VIP", "price": 550.0,
                 "validity_period": 1, "purchase_date": "2024-12-01"}]"#,
        )
        .unwrap();
        fs::write(storage.path("admins.json"), r#"[{"id": 2}]"#).unwrap();

        let guests = storage.load::<Guest>().unwrap();
        assert_eq!(guests[0].email(), "unknown@example.com");
        assert_eq!(guests[0].phone_number(), "000-000-0000");
        assert!(guests[0].purchase_history().is_empty());

        let tickets = storage.load::<Ticket>().unwrap();
        assert_eq!(tickets[0].guest_id(), None);
        assert_eq!(tickets[0].status(), TicketStatus::Active);
        assert!((tickets[0].discount() - 0.0).abs() < f64::EPSILON);

        let admins = storage.load::<Admin>().unwrap();
        assert_eq!(admins[0].name(), "Unknown Admin");
        assert_eq!(admins[0].email(), "unknown@example.com");
    }

    #[test]
    fn reservation_embeds_snapshots() {
        let (storage, _dir) = temp_storage();
        let ticket = Ticket::new(TicketId::new(1), TicketType::SingleDay, 275.0, 1, None).unwrap();
        let mut reservation =
            Reservation::new(ReservationId::new(1), vec![ticket], test_guest(1, "Hamda"), None);
        let payment = Payment::new(PaymentId::new(1), 275.0, PaymentMethod::DebitCard).unwrap();
        reservation.set_payment(payment).unwrap();
        storage.add(Category::Reservation, reservation.clone()).unwrap();

        assert_eq!(storage.load::<Reservation>().unwrap(), vec![reservation]);
    }

    #[test]
    fn counters_survive_reopen() {
        let (storage, dir) = temp_storage();
        assert_eq!(storage.next_id("guest").unwrap(), 1);
        assert_eq!(storage.next_id("guest").unwrap(), 2);
        assert_eq!(storage.next_id("ticket").unwrap(), 1);
        drop(storage);

        let reopened = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.next_id("guest").unwrap(), 3);
        assert_eq!(reopened.next_id("ticket").unwrap(), 2);
    }

    #[test]
    fn unknown_counter_is_rejected() {
        let (storage, _dir) = temp_storage();
        let err = storage.next_id("ride").unwrap_err();
        assert!(matches!(err, ThemeParkError::UnknownCategory(_)));
    }

    #[test]
    fn counter_file_missing_builtin_is_repaired() {
        let (storage, _dir) = temp_storage();
        fs::write(storage.path(COUNTERS_FILE), r#"{"guest": 5}"#).unwrap();
        assert_eq!(storage.next_id("admin").unwrap(), 1);
        assert_eq!(storage.next_id("guest").unwrap(), 5);
    }

    #[test]
    fn default_dir_returns_path() {
        let dir = FileStorage::default_dir();
        assert!(dir.is_ok());
    }

    #[test]
    fn lockfile_created_on_construction() {
        let (storage, _dir) = temp_storage();
        assert!(storage.path(LOCK_FILE).exists());
    }

    #[test]
    fn clear_removes_data_but_keeps_lockfile() {
        let (storage, _dir) = temp_storage();
        storage.add(Category::Guest, test_guest(1, "Hamda")).unwrap();
        let _id = storage.next_id("guest").unwrap();

        storage.clear().unwrap();

        assert!(storage.load::<Guest>().unwrap().is_empty());
        assert_eq!(storage.next_id("guest").unwrap(), 1);
        assert!(storage.path(LOCK_FILE).exists());
    }

    #[test]
    fn concurrent_adds_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let (storage, _dir) = temp_storage();
        let storage = Arc::new(storage);
        let num_threads: usize = 8;
        let items_per_thread: usize = 25;

        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                let storage = Arc::clone(&storage);
                thread::spawn(move || {
                    for _ in 0..items_per_thread {
                        let id = storage.next_id("guest").unwrap();
                        let guest = test_guest(id, &format!("Guest{id}"));
                        storage.add(Category::Guest, guest).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let guests = storage.load::<Guest>().unwrap();
        assert_eq!(guests.len(), num_threads * items_per_thread);
        let mut ids: Vec<u64> = guests.iter().map(Record::record_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), num_threads * items_per_thread);
    }

    #[test]
    fn separate_handles_share_counters() {
        let (first, dir) = temp_storage();
        let second = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let issued = [
            first.next_id("payment").unwrap(),
            second.next_id("payment").unwrap(),
            first.next_id("payment").unwrap(),
        ];
        assert_eq!(issued, [1, 2, 3]);
    }
}
