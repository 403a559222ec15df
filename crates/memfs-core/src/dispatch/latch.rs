//! CountDownLatch - バッチ完了バリア
//!
//! キューとは独立した部品。N 回 `count_down` されると `wait` が解放される。
//! スレッドスケジューリングに依存せず単体テストできる。

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug)]
pub struct CountDownLatch {
    remaining: Mutex<usize>,
    released: Condvar,
}

impl CountDownLatch {
    /// A latch with `count == 0` is released from the start.
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            released: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.remaining.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decrement and return what is left. Extra calls past zero are ignored.
    /// The decrement that reaches zero wakes every waiter.
    pub fn count_down(&self) -> usize {
        let mut remaining = self.lock();
        if *remaining > 0 {
            *remaining -= 1;
            if *remaining == 0 {
                self.released.notify_all();
            }
        }
        *remaining
    }

    pub fn remaining(&self) -> usize {
        *self.lock()
    }

    pub fn is_released(&self) -> bool {
        self.remaining() == 0
    }

    /// Block until the count reaches zero.
    pub fn wait(&self) {
        let guard = self.lock();
        let _released = self
            .released
            .wait_while(guard, |remaining| *remaining > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block for at most `timeout`. Returns `true` if the latch was released.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (remaining, _) = self
            .released
            .wait_timeout_while(guard, timeout, |remaining| *remaining > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *remaining == 0
    }
}
