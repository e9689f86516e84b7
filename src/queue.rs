use crate::model::AccountId;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

/// Shared frontier of account ids awaiting processing. FIFO, unbounded,
/// multi-producer/multi-consumer. No dedup: the same id may be queued any
/// number of times.
#[derive(Default)]
pub struct FrontierQueue {
    inner: Mutex<VecDeque<AccountId>>,
    notify: Notify,
}

impl FrontierQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, id: AccountId) {
        self.inner.lock().unwrap().push_back(id);
        self.notify.notify_one();
    }

    pub fn push_all(&self, ids: impl IntoIterator<Item = AccountId>) {
        let mut queue = self.inner.lock().unwrap();
        for id in ids {
            queue.push_back(id);
            self.notify.notify_one();
        }
    }

    /// Pops the head if present; never blocks.
    pub fn try_pop(&self) -> Option<AccountId> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Pops the head, waiting up to `timeout` for one to arrive. Idle workers
    /// park here instead of spinning on `try_pop`.
    pub async fn pop_timeout(&self, timeout: Duration) -> Option<AccountId> {
        if let Some(id) = self.try_pop() {
            return Some(id);
        }
        let _ = tokio::time::timeout(timeout, self.notify.notified()).await;
        self.try_pop()
    }

    /// Current length, for logging only. Stale by the time the caller reads it.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
