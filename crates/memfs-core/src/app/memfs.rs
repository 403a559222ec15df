//! MemFs - Batch API
//!
//! 1 件なら呼び出しスレッドで直接 Store を叩き、2 件以上なら Dispatcher に
//! バッチとして投げて完了を待つ。
//!
//! Duplicate names:
//! - `create_many` drops later duplicates before submission (first wins).
//! - `write_many` / `delete_many` enqueue every pair as given; the store's
//!   per-name checks decide. Two writes to one name in the same batch are
//!   both applied, in whichever order workers dequeue them.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::report::{BatchReport, Response};
use super::status;
use crate::dispatch::Dispatcher;
use crate::domain::{Operation, Request, Task, TaskKind};
use crate::error::MemfsError;
use crate::observability::DispatcherCounts;
use crate::ports::{IdGenerator, StatusSink};
use crate::store::{Listing, Store};

/// One client session: the store plus the worker pool that mutates it.
///
/// Mutations emit status lines to the session sink. `read` and `list` return
/// their data and leave rendering to the caller.
pub struct MemFs {
    pub(super) store: Arc<Store>,
    pub(super) dispatcher: Dispatcher,
    pub(super) sink: Arc<dyn StatusSink>,
    pub(super) ids: Arc<dyn IdGenerator>,
}

impl MemFs {
    pub fn builder() -> super::MemFsBuilder {
        super::MemFsBuilder::new()
    }

    pub fn create(&self, name: &str) -> Result<(), MemfsError> {
        let result = self.store.create(name);
        self.report_single(TaskKind::Create, name, &result);
        result
    }

    pub fn write(&self, name: &str, content: &[u8]) -> Result<(), MemfsError> {
        let result = self.store.write(name, content);
        self.report_single(TaskKind::Write, name, &result);
        result
    }

    pub fn delete(&self, name: &str) -> Result<(), MemfsError> {
        let result = self.store.delete(name);
        self.report_single(TaskKind::Delete, name, &result);
        result
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, MemfsError> {
        self.store.read(name)
    }

    pub fn list(&self, long_format: bool) -> Listing {
        self.store.list(long_format)
    }

    pub fn create_many(&self, names: &[String]) -> Result<BatchReport, MemfsError> {
        if let [name] = names {
            return Ok(self.inline(TaskKind::Create, name, self.create(name)));
        }

        let mut seen = HashSet::with_capacity(names.len());
        let mut rejected = Vec::new();
        let mut tasks = Vec::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_str()) {
                self.sink.emit(&status::duplicate_in_batch(name));
                rejected.push(name.clone());
                continue;
            }
            tasks.push(Task::create(self.ids.generate_task_id(), name.as_str()));
        }
        self.dispatch(TaskKind::Create, tasks, rejected)
    }

    /// `names[i]` receives `contents[i]`.
    pub fn write_many<C: AsRef<[u8]>>(
        &self,
        names: &[String],
        contents: &[C],
    ) -> Result<BatchReport, MemfsError> {
        if names.len() != contents.len() {
            return Err(MemfsError::CountMismatch {
                expected: names.len(),
                names: names.len(),
                contents: contents.len(),
            });
        }
        if let ([name], [content]) = (names, contents) {
            let result = self.write(name, content.as_ref());
            return Ok(self.inline(TaskKind::Write, name, result));
        }

        let tasks = names
            .iter()
            .zip(contents)
            .map(|(name, content)| {
                Task::write(self.ids.generate_task_id(), name.as_str(), content.as_ref())
            })
            .collect();
        self.dispatch(TaskKind::Write, tasks, Vec::new())
    }

    pub fn delete_many(&self, names: &[String]) -> Result<BatchReport, MemfsError> {
        if let [name] = names {
            return Ok(self.inline(TaskKind::Delete, name, self.delete(name)));
        }

        let tasks = names
            .iter()
            .map(|name| Task::delete(self.ids.generate_task_id(), name.as_str()))
            .collect();
        self.dispatch(TaskKind::Delete, tasks, Vec::new())
    }

    /// Entry point for a parsed command: checks the declared count, then
    /// routes to the matching Batch API call.
    pub fn execute(&self, request: Request) -> Result<Response, MemfsError> {
        request.validate()?;
        let response = match request.operation {
            Operation::Create => Response::Batch(self.create_many(&request.filenames)?),
            Operation::Write => {
                Response::Batch(self.write_many(&request.filenames, &request.contents)?)
            }
            Operation::Delete => Response::Batch(self.delete_many(&request.filenames)?),
            Operation::Read => Response::Content(self.read(&request.filenames[0])?),
            Operation::List => Response::Listing(self.list(request.long_format)),
        };
        Ok(response)
    }

    /// Stop the worker pool after draining queued tasks. Idempotent; also
    /// runs when the session is dropped.
    pub fn shutdown(&self) {
        self.dispatcher.shutdown();
    }

    pub fn counts(&self) -> DispatcherCounts {
        self.dispatcher.counts()
    }

    pub fn worker_count(&self) -> usize {
        self.dispatcher.worker_count()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn report_single(&self, kind: TaskKind, name: &str, result: &Result<(), MemfsError>) {
        match result {
            Ok(()) => self.sink.emit(&status::single_success(kind, name)),
            Err(err) => self.sink.emit(&status::failure(err)),
        }
    }

    fn inline(&self, kind: TaskKind, name: &str, result: Result<(), MemfsError>) -> BatchReport {
        let batch_id = self.ids.generate_batch_id();
        debug!(%batch_id, %kind, name, ok = result.is_ok(), "inline operation");
        BatchReport::inline(batch_id, kind, name, result)
    }

    fn dispatch(
        &self,
        kind: TaskKind,
        tasks: Vec<Task>,
        rejected: Vec<String>,
    ) -> Result<BatchReport, MemfsError> {
        let batch_id = self.ids.generate_batch_id();
        if tasks.is_empty() && rejected.is_empty() {
            return Ok(BatchReport::empty(batch_id, kind));
        }

        let outcomes = self.dispatcher.submit(batch_id, tasks)?;
        let report = BatchReport::from_outcomes(batch_id, kind, outcomes, rejected);
        self.sink.emit(&status::batch_summary(&report));
        Ok(report)
    }
}
