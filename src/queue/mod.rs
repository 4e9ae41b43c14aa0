//! Offline Action Queue Module
//!
//! Keeps user mutations (check-ins, likes, messages, profile edits) safe while the
//! device is offline and replays them once connectivity returns.
//!
//! ## Architecture Overview
//! 1. **Enqueue**: The app hands the queue an action type and an opaque payload.
//!    The local store assigns an id and persists it with `retry_count = 0`.
//! 2. **Trigger**: The host wires a `ConnectivityMonitor` to `spawn_auto_sync`, which
//!    runs a sync pass at startup (if online) and on every offline -> online edge.
//! 3. **Replay**: A sync pass walks the pending actions in insertion order and looks
//!    up a handler for each action type in the `ActionHandlerRegistry`.
//! 4. **Settle**: Success deletes the action. Failure bumps `retry_count` and drops the
//!    action once it reaches the configured bound. Unknown types follow the
//!    configured `UnknownActionPolicy`.
//!
//! ## Submodules
//! - **`types`**: Action ids, action types, queued actions and sync reports.
//! - **`registry`**: Maps action types to async handlers.
//! - **`queue`**: The `ActionQueue` itself (enqueue, list, remove, sync).
//! - **`connectivity`**: Online signal and the explicit auto-sync subscription.
//! - **`protocol`**: HTTP request/response bodies.
//! - **`handlers`**: Axum handlers exposing the queue to the host shell.

pub mod connectivity;
pub mod handlers;
pub mod protocol;
pub mod queue;
pub mod registry;
pub mod types;
