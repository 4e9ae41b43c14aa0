//! Spatial Clustering Module
//!
//! Decides, for a map zoom level, whether venues render as individual markers or
//! fold into count-badged cluster markers.
//!
//! ## Overview
//! - At or above the zoom threshold every point with both coordinates becomes a
//!   marker, colored by occupancy tier (`hot` >= 90, `warm` >= 50, else `cool`).
//! - Below the threshold points are bucketed into square grid cells keyed by
//!   `floor(lat / grid)` and `floor(lng / grid)`. Each non-empty cell is one cluster,
//!   anchored at its first member. A lone point is still a cluster of one.
//! - Output is plain data. Pixel placement, icons and clicks belong to the
//!   rendering layer, and any change of input or zoom means a full recompute.
//!
//! ## Submodules
//! - **`engine`**: `ClusterRouter` and the grid bucketing routine.
//! - **`handlers`**: Axum handler for the host shell.
//! - **`types`**: Points, markers, clusters and the router output.

pub mod engine;
pub mod handlers;
pub mod types;
