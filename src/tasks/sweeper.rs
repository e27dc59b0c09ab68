//! TTL Sweeper Task
//!
//! Background task that periodically removes expired cache entries, and the
//! stop-once handle that shuts it down.

use std::hash::Hash;
use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::{deadline_after, CacheStore, FAR_FUTURE};

// == Sweeper Handle ==
/// Owns the stop signal and join handle of one sweeper task.
///
/// The stop signal is sent at most once no matter how many times
/// [`stop`](Self::stop) runs; dropping the handle also stops the task.
#[derive(Debug)]
pub(crate) struct SweeperHandle {
    stop_tx: Mutex<Option<oneshot::Sender<()>>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl SweeperHandle {
    // == Stop ==
    /// Signals the sweeper to exit.
    ///
    /// Returns `true` only for the call that actually sent the signal.
    pub fn stop(&self) -> bool {
        let stop_tx = self.stop_tx.lock().take();
        match stop_tx {
            Some(tx) => {
                // The task may already be gone if its store was dropped
                let _ = tx.send(());
                debug!("Sweeper stop signal sent");
                true
            }
            None => false,
        }
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stop_tx.lock().is_none()
    }

    /// Whether the task has run to completion.
    pub fn is_finished(&self) -> bool {
        self.join
            .lock()
            .as_ref()
            .map_or(true, JoinHandle::is_finished)
    }

    // == Join ==
    /// Stops the sweeper and waits for the task to exit.
    pub async fn join(&self) {
        self.stop();
        let join = self.join.lock().take();
        if let Some(join) = join {
            // A panicking sweep has nothing left to clean up
            let _ = join.await;
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task wakes every `interval`, first one full interval after spawning,
/// and takes the store's write lock for each pass. It exits permanently on
/// the stop signal or once the store is gone; the task only holds a weak
/// reference, so it never keeps the store alive.
///
/// # Arguments
/// * `runtime` - Tokio runtime the task is spawned on
/// * `store` - Weak reference to the store to sweep
/// * `interval` - Time between sweeps, must be non-zero; capped at about
///   30 years
///
/// # Returns
/// A SweeperHandle that sends the stop signal at most once, either through
/// `stop`/`join` or when the handle is dropped.
pub(crate) fn spawn_sweeper<K, V>(
    runtime: &Handle,
    store: Weak<CacheStore<K, V>>,
    interval: Duration,
) -> SweeperHandle
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    let interval = interval.min(FAR_FUTURE);
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let join = runtime.spawn(async move {
        info!("Starting TTL sweeper with interval of {:?}", interval);

        let mut ticker = interval_at(deadline_after(Instant::now(), interval), interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut stop_rx => {
                    debug!("TTL sweeper received stop signal");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(store) = store.upgrade() else {
                        debug!("TTL sweeper store dropped");
                        break;
                    };

                    let removed = store.sweep_expired();
                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
            }
        }

        info!("TTL sweeper stopped");
    });

    SweeperHandle {
        stop_tx: Mutex::new(Some(stop_tx)),
        join: Mutex::new(Some(join)),
    }
}
