//! Background sweeping of expired entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::RequestCache;

/// A store whose expired entries can be swept.
pub trait ExpiringStore: Send + Sync {
    /// Removes expired entries, returning how many were removed.
    fn cleanup(&self) -> usize;
}

impl<V: Clone + Send> ExpiringStore for RequestCache<V> {
    fn cleanup(&self) -> usize {
        Self::cleanup(self)
    }
}

/// Spawns a task that calls [`ExpiringStore::cleanup`] every `interval`.
///
/// The first sweep happens one full interval after spawning. Abort the
/// returned handle to stop the task.
pub fn spawn_cleanup_task<S>(store: Arc<S>, interval: Duration) -> JoinHandle<()>
where
    S: ExpiringStore + ?Sized + 'static,
{
    tokio::spawn(async move {
        info!(?interval, "starting cache cleanup task");
        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup();
            if removed > 0 {
                info!(removed, "cache cleanup removed expired entries");
            } else {
                debug!("cache cleanup found no expired entries");
            }
        }
    })
}
