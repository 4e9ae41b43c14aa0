use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of a queued action.
///
/// Ids increase monotonically and are never handed out twice by the same store,
/// so ordering by id is ordering by insertion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of mutation an action carries.
///
/// The four built-in kinds map onto the remote data service. Any other string
/// deserializes into `Other` so that an action written by a newer build (or a
/// corrupted entry) is still representable and can be routed to a handler
/// registered under that name, or treated as unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    CheckIn,
    LikePlace,
    SendMessage,
    UpdateProfile,
    Other(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::CheckIn => "check-in",
            ActionType::LikePlace => "like-place",
            ActionType::SendMessage => "send-message",
            ActionType::UpdateProfile => "update-profile",
            ActionType::Other(name) => name,
        }
    }

    /// True for the kinds the remote data service knows natively.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, ActionType::Other(_))
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "check-in" => ActionType::CheckIn,
            "like-place" => ActionType::LikePlace,
            "send-message" => ActionType::SendMessage,
            "update-profile" => ActionType::UpdateProfile,
            _ => ActionType::Other(value),
        }
    }
}

impl From<&str> for ActionType {
    fn from(value: &str) -> Self {
        ActionType::from(value.to_string())
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        match value {
            ActionType::Other(name) => name,
            builtin => builtin.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user mutation waiting to be replayed against the remote data service.
///
/// The store owns the lifetime of every `QueuedAction`: it is created on
/// enqueue, has its `retry_count` bumped on a failed replay, and is deleted on
/// success or once the retry bound is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuedAction {
    pub id: ActionId,
    pub action_type: ActionType,
    /// Opaque to the queue; only the matching handler looks inside.
    pub payload: serde_json::Value,
    /// Milliseconds since the Unix epoch at insertion time.
    pub enqueued_at: u64,
    pub retry_count: u32,
}

/// What to do with an action whose type has no registered handler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownActionPolicy {
    /// Remove it from the store so unprocessable entries cannot pile up.
    #[default]
    Drop,
    /// Leave it untouched: no removal and no retry increment.
    Retain,
}

/// Per-pass counters, mostly for logs and the HTTP surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    pub attempted: usize,
    pub succeeded: usize,
    /// Failed but still in the store for the next pass.
    pub retried: usize,
    /// Removed after exhausting retries.
    pub dropped: usize,
    /// Unknown action types (dropped or retained depending on policy).
    pub skipped: usize,
}

/// How a call to `sync_pending_actions` ended.
///
/// Every variant is a normal return; per-action failures never escape a pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    Offline,
    AlreadyRunning,
    Empty,
    StoreUnavailable,
    Completed(SyncReport),
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
