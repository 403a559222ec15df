//! Domain identifiers (strongly-typed IDs).
//!
//! Batch と Task の ID は ULID ベース。
//! `Id<T>` は PhantomData マーカーで型を分けているので、
//! BatchId と TaskId を取り違えるとコンパイルエラーになる。
//!
//! IDs are only used for log correlation; the store never keys anything by them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker trait providing the display prefix of an ID kind.
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic ULID-backed identifier.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Batch のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Batch {}

impl IdMarker for Batch {
    fn prefix() -> &'static str {
        "batch-"
    }
}

/// Task のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {}

impl IdMarker for Task {
    fn prefix() -> &'static str {
        "task-"
    }
}

/// Identifier of one submitted batch (or of one inline single-item call).
pub type BatchId = Id<Batch>;

/// Identifier of one queued task.
pub type TaskId = Id<Task>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let ulid1 = Ulid::new();
        let ulid2 = Ulid::new();

        let batch = BatchId::from_ulid(ulid1);
        let task = TaskId::from_ulid(ulid2);

        assert_eq!(batch.as_ulid(), ulid1);
        assert_eq!(task.as_ulid(), ulid2);

        assert!(batch.to_string().starts_with("batch-"));
        assert!(task.to_string().starts_with("task-"));
        // let _: BatchId = task; // <- does not compile
    }

    #[test]
    fn ids_can_be_serialized() {
        let batch_id = BatchId::from_ulid(Ulid::new());

        let serialized = serde_json::to_string(&batch_id).unwrap();
        let deserialized: BatchId = serde_json::from_str(&serialized).unwrap();

        assert_eq!(batch_id, deserialized);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<BatchId>(), size_of::<Ulid>());
        assert_eq!(size_of::<TaskId>(), size_of::<Ulid>());
    }
}
