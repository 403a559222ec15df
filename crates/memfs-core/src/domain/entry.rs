//! Entry: one in-memory blob.

use chrono::{DateTime, Utc};

/// An in-memory blob owned exclusively by the [`Store`](crate::store::Store).
///
/// Invariant: `created_at <= updated_at`. The size cap is enforced by the
/// store, which knows the configured limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    content: Vec<u8>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Entry {
    /// Empty entry stamped with `now` for both timestamps.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            content: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Serialized size: fixed overhead plus content length.
    pub fn size(&self, overhead: usize) -> usize {
        overhead + self.content.len()
    }

    /// Append a chunk and refresh `updated_at`.
    ///
    /// A clock that goes backwards never moves `updated_at` before `created_at`.
    pub(crate) fn append(&mut self, chunk: &[u8], now: DateTime<Utc>) {
        self.content.extend_from_slice(chunk);
        self.updated_at = now.max(self.created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn new_entry_is_empty_with_equal_timestamps() {
        let entry = Entry::new(t0());
        assert!(entry.is_empty());
        assert_eq!(entry.created_at(), entry.updated_at());
        assert_eq!(entry.size(48), 48);
    }

    #[test]
    fn append_grows_content_and_refreshes_updated_at() {
        let mut entry = Entry::new(t0());
        let later = t0() + Duration::seconds(5);
        entry.append(b"hello", later);

        assert_eq!(entry.content(), b"hello");
        assert_eq!(entry.len(), 5);
        assert_eq!(entry.updated_at(), later);
        assert_eq!(entry.created_at(), t0());
    }

    #[test]
    fn updated_at_never_precedes_created_at() {
        let mut entry = Entry::new(t0());
        entry.append(b"x", t0() - Duration::seconds(30));
        assert!(entry.created_at() <= entry.updated_at());
    }
}
