//! Domain model (entries, tasks, ids, requests).

pub mod entry;
pub mod ids;
pub mod request;
pub mod task;

pub use entry::Entry;
pub use ids::{BatchId, TaskId};
pub use request::{Operation, Request};
pub use task::{Task, TaskKind};
