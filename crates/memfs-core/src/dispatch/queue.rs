//! TaskQueue - ワーカー共有の FIFO キュー
//!
//! # 実装詳細
//! - VecDeque<QueuedTask> を Mutex で排他制御
//! - Condvar で push / shutdown 時に待機中のワーカーを起こす
//! - shutdown は一方向のラッチ: 立った後は push を拒否し、残りは drain する
//!
//! Worker states and execution totals live under the same lock so a
//! `counts()` snapshot is consistent.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use super::batch::BatchTracker;
use super::state::WorkerState;
use crate::domain::Task;
use crate::error::MemfsError;
use crate::observability::DispatcherCounts;

/// One task plus the batch it reports back to.
pub(crate) struct QueuedTask {
    pub(crate) task: Task,
    pub(crate) position: usize,
    pub(crate) batch: Arc<BatchTracker>,
}

struct QueueState {
    pending: VecDeque<QueuedTask>,
    shutdown: bool,
    workers: Vec<WorkerState>,
    succeeded: u64,
    failed: u64,
}

pub(crate) struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl TaskQueue {
    pub(crate) fn new(worker_count: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                shutdown: false,
                workers: vec![WorkerState::WaitingForWork; worker_count],
                succeeded: 0,
                failed: 0,
            }),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a whole batch under one lock acquisition, then wake workers.
    pub(crate) fn push_batch(&self, tasks: Vec<QueuedTask>) -> Result<(), MemfsError> {
        {
            let mut state = self.lock();
            if state.shutdown {
                return Err(MemfsError::ShuttingDown);
            }
            state.pending.extend(tasks);
        }
        self.available.notify_all();
        Ok(())
    }

    /// Block until a task is available (FIFO) or the queue is shut down and
    /// drained. `None` means the worker must exit.
    pub(crate) fn next(&self, worker_id: usize) -> Option<QueuedTask> {
        let mut state = self.lock();
        state.workers[worker_id] = WorkerState::WaitingForWork;
        state = self
            .available
            .wait_while(state, |s| s.pending.is_empty() && !s.shutdown)
            .unwrap_or_else(PoisonError::into_inner);

        match state.pending.pop_front() {
            Some(task) => {
                state.workers[worker_id] = WorkerState::Executing;
                Some(task)
            }
            None => {
                state.workers[worker_id] = WorkerState::Stopped;
                None
            }
        }
    }

    /// Record the result of the task `worker_id` just executed.
    pub(crate) fn finish(&self, worker_id: usize, succeeded: bool) {
        let mut state = self.lock();
        if succeeded {
            state.succeeded += 1;
        } else {
            state.failed += 1;
        }
        state.workers[worker_id] = WorkerState::WaitingForWork;
    }

    /// Set the shutdown latch and wake every worker. Idempotent.
    pub(crate) fn shutdown(&self) {
        self.lock().shutdown = true;
        self.available.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    /// Mark a worker that never got to run (spawn failure) as stopped.
    pub(crate) fn mark_stopped(&self, worker_id: usize) {
        self.lock().workers[worker_id] = WorkerState::Stopped;
    }

    pub(crate) fn counts(&self) -> DispatcherCounts {
        let state = self.lock();
        let mut counts = DispatcherCounts {
            queued: state.pending.len(),
            succeeded: state.succeeded,
            failed: state.failed,
            ..DispatcherCounts::default()
        };
        for worker in &state.workers {
            match worker {
                WorkerState::WaitingForWork => counts.waiting += 1,
                WorkerState::Executing => counts.executing += 1,
                WorkerState::Stopped => counts.stopped += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BatchId, TaskId};
    use std::thread;
    use std::time::Duration;
    use ulid::Ulid;

    fn batch(names: &[&str]) -> (Arc<BatchTracker>, Vec<QueuedTask>) {
        let tracker = Arc::new(BatchTracker::new(
            BatchId::from_ulid(Ulid::new()),
            names.len(),
        ));
        let tasks = names
            .iter()
            .enumerate()
            .map(|(position, name)| QueuedTask {
                task: Task::create(TaskId::from_ulid(Ulid::new()), *name),
                position,
                batch: Arc::clone(&tracker),
            })
            .collect();
        (tracker, tasks)
    }

    #[test]
    fn tasks_come_out_in_fifo_order_across_batches() {
        let queue = TaskQueue::new(1);
        let (_b1, first) = batch(&["a.txt", "b.txt"]);
        let (_b2, second) = batch(&["c.txt"]);
        queue.push_batch(first).unwrap();
        queue.push_batch(second).unwrap();

        let order: Vec<String> = (0..3)
            .map(|_| queue.next(0).unwrap().task.name().to_string())
            .collect();
        assert_eq!(order, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn push_after_shutdown_is_rejected() {
        let queue = TaskQueue::new(1);
        queue.shutdown();
        let (_b, tasks) = batch(&["a.txt"]);
        assert_eq!(queue.push_batch(tasks).unwrap_err(), MemfsError::ShuttingDown);
        assert!(queue.is_shutdown());
    }

    #[test]
    fn shutdown_drains_before_stopping() {
        let queue = TaskQueue::new(1);
        let (_b, tasks) = batch(&["a.txt", "b.txt"]);
        queue.push_batch(tasks).unwrap();
        queue.shutdown();

        assert!(queue.next(0).is_some());
        assert!(queue.next(0).is_some());
        assert!(queue.next(0).is_none());
        assert_eq!(queue.counts().stopped, 1);
    }

    #[test]
    fn worker_state_follows_next_and_finish() {
        let queue = TaskQueue::new(2);
        let (_b, tasks) = batch(&["a.txt"]);
        queue.push_batch(tasks).unwrap();

        let _task = queue.next(0).unwrap();
        let counts = queue.counts();
        assert_eq!(counts.executing, 1);
        assert_eq!(counts.waiting, 1);

        queue.finish(0, false);
        let counts = queue.counts();
        assert_eq!(counts.executing, 0);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.executed(), 1);
    }

    #[test]
    fn push_wakes_blocked_worker() {
        let queue = Arc::new(TaskQueue::new(1));
        let waiter = thread::spawn({
            let queue = Arc::clone(&queue);
            move || queue.next(0).map(|t| t.task.name().to_string())
        });

        thread::sleep(Duration::from_millis(50));
        let (_b, tasks) = batch(&["late.txt"]);
        queue.push_batch(tasks).unwrap();

        assert_eq!(waiter.join().unwrap(), Some("late.txt".to_string()));
    }
}
