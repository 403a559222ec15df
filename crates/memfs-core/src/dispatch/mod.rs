//! Dispatcher: fixed worker pool + per-batch completion barrier.
//!
//! - `start(n, ..)` でワーカースレッドを n 本起動
//! - `submit()` はバッチ全体を登録してから enqueue し、全タスク完了まで待つ
//! - `shutdown()` で新規受付を止め、残りを drain してから全ワーカーを join
//!
//! A failed task is reported and discarded: no retry, siblings keep running,
//! and the barrier still counts it.

mod batch;
mod latch;
mod queue;
mod state;

pub use batch::TaskOutcome;
pub use latch::CountDownLatch;
pub use state::WorkerState;

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use self::batch::BatchTracker;
use self::queue::{QueuedTask, TaskQueue};
use crate::domain::{BatchId, Task};
use crate::error::MemfsError;
use crate::observability::DispatcherCounts;
use crate::ports::StatusSink;
use crate::store::Store;

pub struct Dispatcher {
    queue: Arc<TaskQueue>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl Dispatcher {
    /// Spawn `worker_count` workers draining into `store`.
    ///
    /// If the OS refuses a thread, the workers already running are shut down
    /// and joined before the error is returned.
    pub fn start(
        worker_count: usize,
        store: Arc<Store>,
        sink: Arc<dyn StatusSink>,
    ) -> Result<Self, MemfsError> {
        let queue = Arc::new(TaskQueue::new(worker_count));
        let mut joins = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let q = Arc::clone(&queue);
            let store = Arc::clone(&store);
            let sink = Arc::clone(&sink);

            let spawned = thread::Builder::new()
                .name(format!("memfs-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, q, store, sink));

            match spawned {
                Ok(join) => joins.push(join),
                Err(e) => {
                    for id in worker_id..worker_count {
                        queue.mark_stopped(id);
                    }
                    queue.shutdown();
                    for join in joins {
                        let _ = join.join();
                    }
                    return Err(MemfsError::WorkerSpawn {
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(workers = worker_count, "dispatcher started");
        Ok(Self {
            queue,
            workers: Mutex::new(joins),
            worker_count,
        })
    }

    /// Enqueue `tasks` as one batch and block until every one of them has
    /// been executed. Outcomes are returned in submission order.
    pub fn submit(
        &self,
        batch_id: BatchId,
        tasks: Vec<Task>,
    ) -> Result<Vec<TaskOutcome>, MemfsError> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let size = tasks.len();
        let tracker = Arc::new(BatchTracker::new(batch_id, size));
        let queued = tasks
            .into_iter()
            .enumerate()
            .map(|(position, task)| QueuedTask {
                task,
                position,
                batch: Arc::clone(&tracker),
            })
            .collect();

        self.queue.push_batch(queued)?;
        info!(%batch_id, tasks = size, "batch submitted");

        tracker.wait();
        let outcomes = tracker.take_outcomes();

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(%batch_id, tasks = size, failed, "batch completed");
        Ok(outcomes)
    }

    /// Stop accepting tasks, drain what is queued, join every worker.
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        self.queue.shutdown();
        let joins = std::mem::take(
            &mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner),
        );
        if joins.is_empty() {
            return;
        }
        for join in joins {
            if join.join().is_err() {
                warn!("worker thread panicked");
            }
        }
        info!("dispatcher stopped");
    }

    pub fn is_shutdown(&self) -> bool {
        self.queue.is_shutdown()
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn counts(&self) -> DispatcherCounts {
        self.queue.counts()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    worker_id: usize,
    queue: Arc<TaskQueue>,
    store: Arc<Store>,
    sink: Arc<dyn StatusSink>,
) {
    debug!(worker_id, "worker waiting for work");

    while let Some(QueuedTask {
        task,
        position,
        batch,
    }) = queue.next(worker_id)
    {
        let result = store.apply(&task);

        match &result {
            Ok(()) => debug!(
                worker_id,
                batch_id = %batch.id(),
                task_id = %task.task_id(),
                kind = %task.kind(),
                name = task.name(),
                "task executed"
            ),
            Err(err) => {
                warn!(
                    worker_id,
                    batch_id = %batch.id(),
                    task_id = %task.task_id(),
                    kind = %task.kind(),
                    name = task.name(),
                    error = err.kind(),
                    "task failed"
                );
                sink.emit(&format!("error: {err}"));
            }
        }

        queue.finish(worker_id, result.is_ok());
        batch.record(TaskOutcome {
            task_id: task.task_id(),
            position,
            kind: task.kind(),
            name: task.name().to_string(),
            result,
        });
    }

    debug!(worker_id, "worker stopped");
}
