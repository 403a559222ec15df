//! Batch tracking: one latch + collected outcomes per submitted batch.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use super::latch::CountDownLatch;
use crate::domain::{BatchId, TaskId, TaskKind};
use crate::error::MemfsError;

/// Result of one executed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    pub task_id: TaskId,
    /// Index of the task within its batch, in submission order.
    pub position: usize,
    pub kind: TaskKind,
    pub name: String,
    #[serde(serialize_with = "serialize_result")]
    pub result: Result<(), MemfsError>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

fn serialize_result<S>(result: &Result<(), MemfsError>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match result {
        Ok(()) => s.serialize_none(),
        Err(err) => s.serialize_some(&err.to_string()),
    }
}

/// Shared by the submitter and every worker holding one of its tasks.
///
/// The latch starts at the batch size, so the whole batch is registered
/// before any worker can consume a task.
#[derive(Debug)]
pub(crate) struct BatchTracker {
    id: BatchId,
    latch: CountDownLatch,
    outcomes: Mutex<Vec<TaskOutcome>>,
}

impl BatchTracker {
    pub(crate) fn new(id: BatchId, size: usize) -> Self {
        Self {
            id,
            latch: CountDownLatch::new(size),
            outcomes: Mutex::new(Vec::with_capacity(size)),
        }
    }

    pub(crate) fn id(&self) -> BatchId {
        self.id
    }

    /// Store the outcome, then release one slot of the latch.
    pub(crate) fn record(&self, outcome: TaskOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome);
        self.latch.count_down();
    }

    pub(crate) fn wait(&self) {
        self.latch.wait();
    }

    /// Outcomes in submission order. Call after `wait`.
    pub(crate) fn take_outcomes(&self) -> Vec<TaskOutcome> {
        let mut outcomes = std::mem::take(
            &mut *self.outcomes.lock().unwrap_or_else(PoisonError::into_inner),
        );
        outcomes.sort_by_key(|o| o.position);
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn outcome(position: usize, result: Result<(), MemfsError>) -> TaskOutcome {
        TaskOutcome {
            task_id: TaskId::from_ulid(Ulid::new()),
            position,
            kind: TaskKind::Create,
            name: format!("f{position}.txt"),
            result,
        }
    }

    #[test]
    fn outcomes_come_back_in_submission_order() {
        let tracker = BatchTracker::new(BatchId::from_ulid(Ulid::new()), 3);
        tracker.record(outcome(2, Ok(())));
        tracker.record(outcome(0, Err(MemfsError::already_exists("f0.txt"))));
        tracker.record(outcome(1, Ok(())));
        tracker.wait();

        let outcomes = tracker.take_outcomes();
        let positions: Vec<_> = outcomes.iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert!(!outcomes[0].is_success());
    }

    #[test]
    fn outcome_serializes_error_as_message() {
        let o = outcome(0, Err(MemfsError::not_found("f0.txt")));
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["kind"], "create");
        assert_eq!(v["result"], "f0.txt does not exist");

        let v = serde_json::to_value(outcome(1, Ok(()))).unwrap();
        assert!(v["result"].is_null());
    }
}
