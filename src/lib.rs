//! Nightlife Core Library
//!
//! Device-side logic behind the nightlife discovery app that is worth more than
//! glue: the offline action queue and the map clustering router. The binary
//! (`main.rs`) hosts both behind a small HTTP surface for the app shell.
//!
//! ## Architecture Modules
//! - **`queue`**: Durable offline queue for user mutations. Replays check-ins, likes,
//!   messages and profile edits against the backend with a bounded retry count.
//! - **`storage`**: Local stores backing the queue (in-memory and JSON file).
//! - **`remote`**: Contract for the hosted backend plus a REST adapter.
//! - **`clustering`**: Zoom-dependent marker/cluster routing over a fixed grid.
//! - **`config`**: Runtime configuration and the default thresholds.

pub mod clustering;
pub mod config;
pub mod queue;
pub mod remote;
pub mod storage;
