//! Durable Action Queue
//!
//! Persists user mutations locally and replays them against the remote data
//! service when the device is online.
//!
//! ## Responsibilities
//! - **Enqueue**: Fire-and-forget append to the local store. A store failure is
//!   logged and swallowed so the caller is never blocked.
//! - **Sync**: One pass over the pending actions in insertion order. Every action
//!   runs to completion before the next one starts, and a failing action never
//!   aborts the pass.
//! - **Retry bound**: A failed action has its retry count bumped; once the count
//!   reaches `max_retries` it is dropped for good (logged, no dead-letter store).
//! - **Exclusion**: Overlapping sync calls do not process the same batch twice.

use super::connectivity::Connectivity;
use super::registry::ActionHandlerRegistry;
use super::types::*;
use crate::config::QueueConfig;
use crate::storage::store::ActionStore;

use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct ActionQueue {
    store: Arc<dyn ActionStore>,
    handlers: Arc<ActionHandlerRegistry>,
    connectivity: Arc<dyn Connectivity>,
    config: QueueConfig,
    /// Set for the duration of a sync pass.
    syncing: AtomicBool,
}

/// Clears the in-progress flag even if the pass unwinds.
struct SyncGuard<'a>(&'a AtomicBool);

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Result of replaying a single action.
enum Replay {
    Succeeded,
    Retried,
    Dropped,
    Skipped,
}

impl ActionQueue {
    pub fn new(
        store: Arc<dyn ActionStore>,
        handlers: Arc<ActionHandlerRegistry>,
        connectivity: Arc<dyn Connectivity>,
        config: QueueConfig,
    ) -> Self {
        Self {
            store,
            handlers,
            connectivity,
            config,
            syncing: AtomicBool::new(false),
        }
    }

    /// Appends an action. Never fails from the caller's point of view.
    pub fn enqueue(&self, action_type: ActionType, payload: serde_json::Value) {
        if let Err(e) = self.try_enqueue(action_type.clone(), payload) {
            tracing::error!("Failed to enqueue {} action: {:#}", action_type, e);
        }
    }

    /// Appends an action and reports store failures to the caller.
    pub fn try_enqueue(
        &self,
        action_type: ActionType,
        payload: serde_json::Value,
    ) -> Result<ActionId> {
        let action = self.store.insert(action_type, payload)?;
        tracing::info!("Queued {} action {}", action.action_type, action.id);
        Ok(action.id)
    }

    /// All pending actions in insertion order. Empty if the store can't be read.
    pub fn list_pending(&self) -> Vec<QueuedAction> {
        match self.store.get_all() {
            Ok(actions) => actions,
            Err(e) => {
                tracing::error!("Failed to read pending actions: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Removes an action. Removing an unknown id is a no-op.
    pub fn remove_action(&self, id: ActionId) {
        if let Err(e) = self.store.delete(id) {
            tracing::error!("Failed to remove action {}: {:#}", id, e);
        }
    }

    /// Discards every pending action.
    pub fn clear(&self) {
        match self.store.clear() {
            Ok(()) => tracing::info!("Cleared pending actions"),
            Err(e) => tracing::error!("Failed to clear pending actions: {:#}", e),
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    /// Runs one sync pass.
    ///
    /// 1. Offline: return without touching the store.
    /// 2. Another pass running: return without touching the store.
    /// 3. Replay every pending action in insertion order, isolating failures.
    pub async fn sync_pending_actions(&self) -> SyncOutcome {
        if !self.connectivity.is_online() {
            tracing::debug!("Offline, skipping sync");
            return SyncOutcome::Offline;
        }

        if self
            .syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Sync already in progress, skipping");
            return SyncOutcome::AlreadyRunning;
        }
        let _guard = SyncGuard(&self.syncing);

        let pending = match self.store.get_all() {
            Ok(pending) => pending,
            Err(e) => {
                tracing::error!("Failed to load pending actions for sync: {:#}", e);
                return SyncOutcome::StoreUnavailable;
            }
        };

        if pending.is_empty() {
            return SyncOutcome::Empty;
        }

        tracing::info!("Syncing {} pending actions", pending.len());

        let mut report = SyncReport::default();
        for action in pending {
            report.attempted += 1;
            match self.replay(action).await {
                Replay::Succeeded => report.succeeded += 1,
                Replay::Retried => report.retried += 1,
                Replay::Dropped => report.dropped += 1,
                Replay::Skipped => report.skipped += 1,
            }
        }

        tracing::info!(
            "Sync finished: {} succeeded, {} will retry, {} dropped, {} skipped",
            report.succeeded,
            report.retried,
            report.dropped,
            report.skipped
        );

        SyncOutcome::Completed(report)
    }

    async fn replay(&self, action: QueuedAction) -> Replay {
        let Some(handler) = self.handlers.get(&action.action_type) else {
            return self.skip_unknown(&action);
        };

        tracing::debug!(
            "Replaying {} action {} (attempt {})",
            action.action_type,
            action.id,
            action.retry_count + 1
        );

        // A separate task turns a panicking handler into an ordinary failure.
        let result = match tokio::spawn(handler(action.clone())).await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("Handler aborted: {}", e)),
        };

        match result {
            Ok(()) => {
                if let Err(e) = self.store.delete(action.id) {
                    // The action stays queued and will be delivered again next pass.
                    tracing::error!(
                        "Action {} applied but could not be removed: {:#}",
                        action.id,
                        e
                    );
                }
                tracing::debug!("Action {} applied", action.id);
                Replay::Succeeded
            }
            Err(e) => self.record_failure(action, e),
        }
    }

    fn record_failure(&self, mut action: QueuedAction, error: anyhow::Error) -> Replay {
        action.retry_count += 1;

        if action.retry_count >= self.config.max_retries {
            tracing::warn!(
                "Dropping {} action {} after {} failed attempts: {:#}",
                action.action_type,
                action.id,
                action.retry_count,
                error
            );
            if let Err(e) = self.store.delete(action.id) {
                tracing::error!("Failed to drop action {}: {:#}", action.id, e);
            }
            return Replay::Dropped;
        }

        tracing::warn!(
            "Action {} failed (attempt {}/{}): {:#}",
            action.id,
            action.retry_count,
            self.config.max_retries,
            error
        );
        if let Err(e) = self.store.update(&action) {
            tracing::error!("Failed to record retry for action {}: {:#}", action.id, e);
        }
        Replay::Retried
    }

    fn skip_unknown(&self, action: &QueuedAction) -> Replay {
        match self.config.unknown_action_policy {
            UnknownActionPolicy::Drop => {
                tracing::warn!(
                    "No handler for action type '{}', dropping action {}",
                    action.action_type,
                    action.id
                );
                if let Err(e) = self.store.delete(action.id) {
                    tracing::error!("Failed to drop action {}: {:#}", action.id, e);
                }
            }
            UnknownActionPolicy::Retain => {
                tracing::warn!(
                    "No handler for action type '{}', leaving action {} queued",
                    action.action_type,
                    action.id
                );
            }
        }
        Replay::Skipped
    }
}
