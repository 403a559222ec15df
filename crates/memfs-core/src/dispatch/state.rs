//! Worker state machine.

use serde::{Deserialize, Serialize};

/// Per-worker state.
///
/// State transitions:
/// - WaitingForWork -> Executing -> WaitingForWork (one per task)
/// - WaitingForWork -> Stopped (queue drained after shutdown was requested)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkerState {
    /// Blocked on the queue, waiting for a task or for shutdown.
    WaitingForWork,

    /// Running one task against the store.
    Executing,

    /// Exited its loop; never leaves this state.
    Stopped,
}

impl WorkerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkerState::Stopped)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, WorkerState::Executing)
    }
}
