//! BatchReport / Response - Batch API の戻り値

use crate::dispatch::TaskOutcome;
use crate::domain::{BatchId, TaskKind};
use crate::error::MemfsError;
use crate::store::Listing;

/// Aggregate result of one create/write/delete call (inline or dispatched).
///
/// `succeeded.len() + failed.len()` is the number of store calls attempted.
/// `rejected` names were never enqueued (duplicates within one `create_many`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub batch_id: BatchId,
    pub kind: TaskKind,
    /// Ran on the calling thread instead of the worker pool.
    pub inline: bool,
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, MemfsError)>,
    pub rejected: Vec<String>,
}

impl BatchReport {
    pub fn empty(batch_id: BatchId, kind: TaskKind) -> Self {
        Self {
            batch_id,
            kind,
            inline: false,
            succeeded: Vec::new(),
            failed: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub(crate) fn inline(
        batch_id: BatchId,
        kind: TaskKind,
        name: &str,
        result: Result<(), MemfsError>,
    ) -> Self {
        let mut report = Self::empty(batch_id, kind);
        report.inline = true;
        match result {
            Ok(()) => report.succeeded.push(name.to_string()),
            Err(err) => report.failed.push((name.to_string(), err)),
        }
        report
    }

    pub(crate) fn from_outcomes(
        batch_id: BatchId,
        kind: TaskKind,
        outcomes: Vec<TaskOutcome>,
        rejected: Vec<String>,
    ) -> Self {
        let mut report = Self::empty(batch_id, kind);
        report.rejected = rejected;
        for outcome in outcomes {
            match outcome.result {
                Ok(()) => report.succeeded.push(outcome.name),
                Err(err) => report.failed.push((outcome.name, err)),
            }
        }
        report
    }

    /// Number of store calls attempted (success or failure).
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.rejected.is_empty()
    }
}

/// What `MemFs::execute` hands back to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Batch(BatchReport),
    Content(Vec<u8>),
    Listing(Listing),
}
