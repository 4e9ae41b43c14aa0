//! Connectivity signal and the auto-sync subscription.
//!
//! The host owns a `ConnectivityMonitor`, feeds it platform online/offline
//! events, and calls `spawn_auto_sync` once during startup. Nothing here runs
//! as a side effect of constructing a queue.

use super::queue::ActionQueue;
use super::types::SyncOutcome;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long auto-sync waits before retrying when another pass holds the queue.
const BUSY_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Fast local "is the device online" query. Does not touch the network.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Snapshot broadcast to subscribers.
///
/// `reconnects` counts offline -> online edges. A watch channel only keeps the
/// latest value, so subscribers compare counters rather than flags to notice an
/// edge that was followed by further updates before they looked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityState {
    pub online: bool,
    pub reconnects: u64,
}

/// Holds the current online flag and broadcasts transitions.
pub struct ConnectivityMonitor {
    state: watch::Sender<ConnectivityState>,
}

impl ConnectivityMonitor {
    pub fn new(online: bool) -> Arc<Self> {
        let (state, _) = watch::channel(ConnectivityState {
            online,
            reconnects: 0,
        });
        Arc::new(Self { state })
    }

    /// Records the platform's current state. Returns true if it changed.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.state.send_if_modified(|state| {
            if state.online == online {
                return false;
            }
            state.online = online;
            if online {
                state.reconnects += 1;
            }
            true
        });

        if changed {
            tracing::info!(
                "Connectivity changed: {}",
                if online { "online" } else { "offline" }
            );
        }
        changed
    }

    /// Number of offline -> online edges seen so far.
    pub fn reconnects(&self) -> u64 {
        self.state.borrow().reconnects
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.state.subscribe()
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        self.state.borrow().online
    }
}

/// Runs a pass, waiting out any pass that someone else (e.g. a manual sync) is
/// already running so the actions behind this trigger are not skipped.
async fn sync_now(queue: &ActionQueue) -> SyncOutcome {
    loop {
        let outcome = queue.sync_pending_actions().await;
        if outcome != SyncOutcome::AlreadyRunning {
            return outcome;
        }
        tokio::time::sleep(BUSY_RETRY_INTERVAL).await;
    }
}

/// Syncs once if already online, then once for every offline -> online edge.
///
/// Edges that happen while a pass is running are not lost: the reconnect
/// counter has moved on by the time the pass returns, which triggers another.
/// The returned handle runs until the monitor is dropped or the handle is aborted.
pub fn spawn_auto_sync(queue: Arc<ActionQueue>, monitor: &ConnectivityMonitor) -> JoinHandle<()> {
    let mut changes = monitor.subscribe();

    tokio::spawn(async move {
        let initial = *changes.borrow_and_update();
        let mut synced_reconnects = initial.reconnects;

        if initial.online {
            tracing::info!("Online at startup, syncing pending actions");
            let outcome = sync_now(&queue).await;
            tracing::debug!("Startup sync finished: {:?}", outcome);
        }

        while changes.changed().await.is_ok() {
            let state = *changes.borrow_and_update();

            if state.online && state.reconnects > synced_reconnects {
                synced_reconnects = state.reconnects;
                tracing::info!("Back online, syncing pending actions");
                let outcome = sync_now(&queue).await;
                tracing::debug!("Reconnect sync finished: {:?}", outcome);
            }
        }

        tracing::debug!("Connectivity monitor dropped, auto-sync stopped");
    })
}
