//! Store: name -> Entry mapping behind one exclusive lock.
//!
//! Every public operation is a single critical section (no nesting), so
//! readers never observe a half-applied mutation and `list` never races a
//! concurrent write mid-scan.

mod listing;

pub use listing::{EntryDetail, ListEntry, Listing, format_timestamp};

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::config::MemfsConfig;
use crate::domain::{Entry, Task, TaskKind};
use crate::error::MemfsError;
use crate::ports::Clock;

pub struct Store {
    /// BTreeMap: iteration order is lexicographic, which `list` relies on.
    entries: Mutex<BTreeMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    max_entry_size: usize,
    entry_overhead: usize,
}

impl Store {
    pub fn new(config: &MemfsConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            clock,
            max_entry_size: config.max_entry_size,
            entry_overhead: config.entry_overhead,
        }
    }

    // Each critical section is a single map operation, so the map is
    // consistent even if a previous holder panicked.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert an empty entry iff `name` is absent.
    pub fn create(&self, name: &str) -> Result<(), MemfsError> {
        let mut entries = self.lock();
        if entries.contains_key(name) {
            return Err(MemfsError::already_exists(name));
        }
        entries.insert(name.to_string(), Entry::new(self.clock.now()));
        trace!(name, "entry created");
        Ok(())
    }

    /// Append `chunk` to an existing entry. All-or-nothing: a write that
    /// would push the entry over the cap leaves it untouched.
    pub fn write(&self, name: &str, chunk: &[u8]) -> Result<(), MemfsError> {
        let mut entries = self.lock();
        let entry = entries
            .get_mut(name)
            .ok_or_else(|| MemfsError::not_found(name))?;

        let size = entry.size(self.entry_overhead) + chunk.len();
        if size > self.max_entry_size {
            return Err(MemfsError::TooLarge {
                name: name.to_string(),
                size,
                limit: self.max_entry_size,
            });
        }
        entry.append(chunk, self.clock.now());
        trace!(name, bytes = chunk.len(), "entry appended");
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<(), MemfsError> {
        self.lock()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| MemfsError::not_found(name))
    }

    /// Copy of the entry's content.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, MemfsError> {
        self.lock()
            .get(name)
            .map(|e| e.content().to_vec())
            .ok_or_else(|| MemfsError::not_found(name))
    }

    /// Snapshot sorted by name, taken under the store lock.
    pub fn list(&self, long_format: bool) -> Listing {
        let entries = self.lock();
        let entries = entries
            .iter()
            .map(|(name, entry)| ListEntry {
                name: name.clone(),
                detail: long_format.then(|| EntryDetail {
                    size: entry.size(self.entry_overhead),
                    created_at: entry.created_at(),
                    updated_at: entry.updated_at(),
                }),
            })
            .collect();
        Listing {
            long_format,
            entries,
        }
    }

    /// Run the store primitive a queued task describes.
    pub fn apply(&self, task: &Task) -> Result<(), MemfsError> {
        match task.kind() {
            TaskKind::Create => self.create(task.name()),
            TaskKind::Write => self.write(task.name(), task.payload()),
            TaskKind::Delete => self.delete(task.name()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn max_entry_size(&self) -> usize {
        self.max_entry_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};
    use ulid::Ulid;

    fn store() -> Store {
        Store::new(&MemfsConfig::default(), Arc::new(SystemClock))
    }

    #[test]
    fn create_then_read_is_empty() {
        let store = store();
        store.create("a.txt").unwrap();
        assert_eq!(store.read("a.txt").unwrap(), Vec::<u8>::new());
        assert!(store.contains("a.txt"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_on_existing_name_does_not_mutate() {
        let store = store();
        store.create("a.txt").unwrap();
        store.write("a.txt", b"keep me").unwrap();
        let before = store.list(true);

        let err = store.create("a.txt").unwrap_err();
        assert_eq!(err, MemfsError::already_exists("a.txt"));
        assert_eq!(store.read("a.txt").unwrap(), b"keep me");
        assert_eq!(store.list(true), before);
    }

    #[test]
    fn write_missing_is_not_found() {
        let store = store();
        assert_eq!(
            store.write("nope.txt", b"x").unwrap_err(),
            MemfsError::not_found("nope.txt")
        );
    }

    #[test]
    fn write_appends() {
        let store = store();
        store.create("f.txt").unwrap();
        store.write("f.txt", b"hel").unwrap();
        store.write("f.txt", b"lo").unwrap();
        assert_eq!(store.read("f.txt").unwrap(), b"hello");
    }

    #[test]
    fn write_at_exact_cap_succeeds_and_one_more_byte_fails() {
        let store = store();
        store.create("f.txt").unwrap();
        let capacity = MemfsConfig::default().content_capacity();

        store.write("f.txt", &vec![b'a'; capacity]).unwrap();
        let err = store.write("f.txt", b"b").unwrap_err();
        assert!(matches!(err, MemfsError::TooLarge { size: 2049, limit: 2048, .. }));
        assert_eq!(store.read("f.txt").unwrap().len(), capacity);
    }

    #[test]
    fn oversized_write_is_all_or_nothing() {
        let store = store();
        store.create("f.txt").unwrap();
        store.write("f.txt", b"abc").unwrap();

        let err = store.write("f.txt", &vec![b'z'; 4096]).unwrap_err();
        assert!(matches!(err, MemfsError::TooLarge { .. }));
        assert_eq!(store.read("f.txt").unwrap(), b"abc");
    }

    #[test]
    fn delete_then_read_is_not_found() {
        let store = store();
        store.create("x.txt").unwrap();
        store.delete("x.txt").unwrap();
        assert_eq!(store.read("x.txt").unwrap_err(), MemfsError::not_found("x.txt"));
        assert_eq!(store.delete("x.txt").unwrap_err(), MemfsError::not_found("x.txt"));
        assert!(store.is_empty());
    }

    #[test]
    fn list_is_sorted_by_name() {
        let store = store();
        for name in ["c.txt", "a.txt", "b.txt"] {
            store.create(name).unwrap();
        }
        let listing = store.list(false);
        assert_eq!(listing.names().collect::<Vec<_>>(), ["a.txt", "b.txt", "c.txt"]);
        assert!(listing.entries.iter().all(|e| e.detail.is_none()));
    }

    #[test]
    fn long_list_reports_size_and_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let store = Store::new(&MemfsConfig::default(), Arc::new(FixedClock::new(at)));
        store.create("a.txt").unwrap();
        store.write("a.txt", b"hello").unwrap();

        let listing = store.list(true);
        let detail = listing.entries[0].detail.as_ref().unwrap();
        assert_eq!(detail.size, 48 + 5);
        assert_eq!(detail.created_at, at);
        assert_eq!(detail.updated_at, at);
    }

    #[test]
    fn apply_routes_by_task_kind() {
        let store = store();
        let id = TaskId::from_ulid(Ulid::new());

        store.apply(&Task::create(id, "t.txt")).unwrap();
        store.apply(&Task::write(id, "t.txt", "data")).unwrap();
        assert_eq!(store.read("t.txt").unwrap(), b"data");
        store.apply(&Task::delete(id, "t.txt")).unwrap();
        assert!(!store.contains("t.txt"));
    }
}
