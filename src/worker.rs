use crate::collector::Collector;
use crate::graph::GraphError;
use crate::model::AccountId;
use crate::queue::FrontierQueue;
use crate::sink::PersistenceSink;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fixed suspension after an upstream failure. Local to the failing worker;
/// other credentials keep draining the queue.
pub const BACKOFF: Duration = Duration::from_secs(80);

/// How long an idle worker parks on the queue before rechecking cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Fetch each queued account's recent posts; the frontier only drains.
    Posts,
    /// Sample each queued account's connections and feed them back in.
    Discover,
}

/// Process-lifetime record of already-discovered ids, shared by all workers
/// when the opt-in dedup policy is enabled.
pub type VisitedSet = Arc<Mutex<HashSet<AccountId>>>;

/// Everything one worker needs: its own credentialed collector plus handles
/// to the shared queue and sink.
pub struct Worker {
    pub name: String,
    pub collector: Collector,
    pub queue: Arc<FrontierQueue>,
    pub sink: Arc<dyn PersistenceSink>,
    pub mode: Mode,
    pub visited: Option<VisitedSet>,
    pub cancel: CancellationToken,
}

impl Worker {
    /// Drains the queue until cancelled. A failed id is dropped, never
    /// retried; the worker sleeps out the backoff and resumes.
    pub async fn run(self) {
        loop {
            if self.cancel.is_cancelled() {
                return;
            }
            let popped = tokio::select! {
                _ = self.cancel.cancelled() => return,
                popped = self.queue.pop_timeout(POLL_INTERVAL) => popped,
            };
            let Some(id) = popped else { continue };

            log::info!(
                "[{}] Getting {} - {} ids left in queue",
                self.name,
                id,
                self.queue.len()
            );
            if let Err(e) = self.process(&id).await {
                log::warn!("[{}] Upstream failure for {}: {}", self.name, id, e);
                tokio::select! {
                    _ = self.cancel.cancelled() => return,
                    _ = tokio::time::sleep(BACKOFF) => {}
                }
            }
        }
    }

    async fn process(&self, id: &AccountId) -> Result<(), GraphError> {
        match self.mode {
            Mode::Posts => {
                let batch = self.collector.get_posts(id).await?;
                log::info!("[{}] Saving {} posts for {}", self.name, batch.len(), id);
                if let Err(e) = self.sink.append_posts(&batch).await {
                    log::error!("[{}] Failed to persist posts for {}: {}", self.name, id, e);
                }
            }
            Mode::Discover => {
                let mut discovered = self.collector.get_discovered_accounts(id).await?;
                if let Some(visited) = &self.visited {
                    let mut seen = visited.lock().unwrap();
                    seen.insert(id.clone());
                    discovered.retain(|d| seen.insert(d.clone()));
                }
                log::info!(
                    "[{}] Saving {} discovered accounts for {}",
                    self.name,
                    discovered.len(),
                    id
                );
                if let Err(e) = self.sink.append_account_ids(&discovered).await {
                    log::error!("[{}] Failed to persist ids for {}: {}", self.name, id, e);
                }
                self.queue.push_all(discovered);
            }
        }
        Ok(())
    }
}
