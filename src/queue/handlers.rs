use super::connectivity::{Connectivity, ConnectivityMonitor};
use super::protocol::*;
use super::queue::ActionQueue;
use super::types::*;

use axum::{Extension, Json, extract::Path, http::StatusCode};
use std::sync::Arc;

pub async fn handle_enqueue_action(
    Extension(queue): Extension<Arc<ActionQueue>>,
    Json(req): Json<EnqueueRequest>,
) -> (StatusCode, Json<EnqueueResponse>) {
    // Fire-and-forget: store failures are logged by the queue, not reported here.
    queue.enqueue(req.action_type, req.payload);
    (StatusCode::ACCEPTED, Json(EnqueueResponse { accepted: true }))
}

pub async fn handle_list_pending(
    Extension(queue): Extension<Arc<ActionQueue>>,
) -> (StatusCode, Json<PendingActionsResponse>) {
    let actions = queue.list_pending();
    (
        StatusCode::OK,
        Json(PendingActionsResponse {
            count: actions.len(),
            actions,
        }),
    )
}

pub async fn handle_remove_action(
    Extension(queue): Extension<Arc<ActionQueue>>,
    Path(id): Path<u64>,
) -> StatusCode {
    queue.remove_action(ActionId(id));
    StatusCode::NO_CONTENT
}

pub async fn handle_sync(
    Extension(queue): Extension<Arc<ActionQueue>>,
) -> (StatusCode, Json<SyncOutcome>) {
    let outcome = queue.sync_pending_actions().await;
    (StatusCode::OK, Json(outcome))
}

pub async fn handle_get_connectivity(
    Extension(queue): Extension<Arc<ActionQueue>>,
    Extension(monitor): Extension<Arc<ConnectivityMonitor>>,
) -> (StatusCode, Json<ConnectivityResponse>) {
    (
        StatusCode::OK,
        Json(ConnectivityResponse {
            online: monitor.is_online(),
            changed: false,
            syncing: queue.is_syncing(),
        }),
    )
}

/// Platform shells report online/offline transitions here. The auto-sync
/// subscription picks up the change; this handler does not sync by itself.
pub async fn handle_set_connectivity(
    Extension(queue): Extension<Arc<ActionQueue>>,
    Extension(monitor): Extension<Arc<ConnectivityMonitor>>,
    Json(req): Json<ConnectivityRequest>,
) -> (StatusCode, Json<ConnectivityResponse>) {
    let changed = monitor.set_online(req.online);
    (
        StatusCode::OK,
        Json(ConnectivityResponse {
            online: req.online,
            changed,
            syncing: queue.is_syncing(),
        }),
    )
}
