use crate::queue::types::{ActionId, ActionType, QueuedAction};

use anyhow::Result;

/// Contract for the device-local store backing the action queue.
///
/// Implementations must serialize conflicting writes themselves; the queue
/// issues one call per record and never holds a lock across calls.
pub trait ActionStore: Send + Sync {
    /// Appends a new action with `retry_count = 0` and a freshly assigned id.
    fn insert(&self, action_type: ActionType, payload: serde_json::Value) -> Result<QueuedAction>;

    /// All stored actions in insertion order.
    fn get_all(&self) -> Result<Vec<QueuedAction>>;

    fn get(&self, id: ActionId) -> Result<Option<QueuedAction>>;

    /// Replaces the stored record with the same id. Fails if the id is absent.
    fn update(&self, action: &QueuedAction) -> Result<()>;

    /// Removes the record. Removing an absent id is not an error.
    fn delete(&self, id: ActionId) -> Result<()>;

    fn clear(&self) -> Result<()>;

    /// Flushes and releases the store. Later calls return an error.
    fn close(&self) -> Result<()>;
}
