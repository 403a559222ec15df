use serde::{Deserialize, Serialize};

/// Snapshot of the dispatcher, taken under the queue lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherCounts {
    /// Tasks enqueued but not yet picked up by a worker.
    pub queued: usize,

    /// Workers per state.
    pub waiting: usize,
    pub executing: usize,
    pub stopped: usize,

    /// Tasks executed since start, by result.
    pub succeeded: u64,
    pub failed: u64,
}

impl DispatcherCounts {
    pub fn executed(&self) -> u64 {
        self.succeeded + self.failed
    }
}
