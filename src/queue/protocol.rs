//! HTTP bodies for the queue endpoints.

use super::types::*;
use serde::{Deserialize, Serialize};

pub const ENDPOINT_ACTIONS: &str = "/actions";
pub const ENDPOINT_ACTION_BY_ID: &str = "/actions/:id";
pub const ENDPOINT_SYNC: &str = "/actions/sync";
pub const ENDPOINT_CONNECTIVITY: &str = "/connectivity";

#[derive(Debug, Serialize, Deserialize)]
pub struct EnqueueRequest {
    pub action_type: ActionType,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnqueueResponse {
    pub accepted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PendingActionsResponse {
    pub count: usize,
    pub actions: Vec<QueuedAction>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectivityRequest {
    pub online: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectivityResponse {
    pub online: bool,
    pub changed: bool,
    pub syncing: bool,
}
