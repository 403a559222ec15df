use serde::{Deserialize, Serialize};
use std::fmt;

use super::TaskId;

/// Kind of mutation a queued task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Create,
    Write,
    Delete,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Create => "create",
            TaskKind::Write => "write",
            TaskKind::Delete => "delete",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one pending store operation.
///
/// Consumed exactly once by exactly one worker. `payload` is empty for
/// `Create` and `Delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    task_id: TaskId,
    kind: TaskKind,
    name: String,
    payload: Vec<u8>,
}

impl Task {
    pub fn create(task_id: TaskId, name: impl Into<String>) -> Self {
        Self {
            task_id,
            kind: TaskKind::Create,
            name: name.into(),
            payload: Vec::new(),
        }
    }

    pub fn write(task_id: TaskId, name: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            task_id,
            kind: TaskKind::Write,
            name: name.into(),
            payload: payload.into(),
        }
    }

    pub fn delete(task_id: TaskId, name: impl Into<String>) -> Self {
        Self {
            task_id,
            kind: TaskKind::Delete,
            name: name.into(),
            payload: Vec::new(),
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}
