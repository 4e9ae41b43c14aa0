//! Local Durable Store Module
//!
//! Holds queued actions on the device until they are confirmed by the remote
//! data service.
//!
//! ## Core Concepts
//! - **Ownership**: The store is the only owner of a `QueuedAction`. The queue reads
//!   snapshots and asks the store to update or delete by id.
//! - **Identity**: Ids are assigned on insert, increase monotonically and are never
//!   reused, so `get_all` in id order is insertion order.
//! - **Atomicity**: Every single-record operation is atomic with respect to the
//!   others. There are no multi-record transactions.
//! - **Lifecycle**: Stores are constructed explicitly and closed explicitly. After
//!   `close`, every operation fails.
//!
//! ## Submodules
//! - **`store`**: The `ActionStore` contract shared by all backends.
//! - **`memory`**: DashMap-backed store for tests and ephemeral hosts.
//! - **`file`**: JSON-on-disk store that survives process restarts.

pub mod file;
pub mod memory;
pub mod store;

#[cfg(test)]
mod tests;
