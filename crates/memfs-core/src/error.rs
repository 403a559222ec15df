use thiserror::Error;

/// Error taxonomy for store and batch operations.
///
/// Every variant is an expected, recoverable condition: a failing operation is
/// reported on its own and never aborts sibling operations in the same batch.
/// `Clone` so that per-task outcomes can be collected for the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemfsError {
    #[error("another file with same name exists: {name}")]
    AlreadyExists { name: String },

    #[error("{name} does not exist")]
    NotFound { name: String },

    #[error("{name} has reached the maximum size of {limit} bytes (would be {size})")]
    TooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error("expected {expected} files, but got {names} names and {contents} contents")]
    CountMismatch {
        expected: usize,
        names: usize,
        contents: usize,
    },

    #[error("dispatcher is shutting down; no new tasks are accepted")]
    ShuttingDown,

    #[error("failed to spawn worker thread: {message}")]
    WorkerSpawn { message: String },
}

impl MemfsError {
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Short machine-friendly kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "already_exists",
            Self::NotFound { .. } => "not_found",
            Self::TooLarge { .. } => "too_large",
            Self::CountMismatch { .. } => "count_mismatch",
            Self::ShuttingDown => "shutting_down",
            Self::WorkerSpawn { .. } => "worker_spawn",
        }
    }
}
