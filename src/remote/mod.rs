//! Remote Data Service Module
//!
//! The hosted backend is an external collaborator. This module defines the four
//! operations the action queue needs from it and a REST adapter that speaks to a
//! PostgREST-style endpoint.
//!
//! ## Submodules
//! - **`service`**: The `RemoteDataService` contract and the glue that registers one
//!   handler per built-in action type.
//! - **`http`**: `reqwest`-based implementation with a per-request timeout.

pub mod http;
pub mod service;
