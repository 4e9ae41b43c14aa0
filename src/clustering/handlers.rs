use super::engine::ClusterRouter;
use super::types::{ClusterOutput, ClusterRequest};

use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

pub const ENDPOINT_MAP_CLUSTERS: &str = "/map/clusters";

pub async fn handle_compute_clusters(
    Extension(router): Extension<Arc<ClusterRouter>>,
    Json(req): Json<ClusterRequest>,
) -> (StatusCode, Json<ClusterOutput>) {
    let output = match req.grid_size {
        Some(grid_size) => router.compute_with_grid(&req.points, req.zoom, grid_size),
        None => router.compute(&req.points, req.zoom),
    };

    tracing::debug!(
        "Routed {} points at zoom {} into {} map markers",
        req.points.len(),
        req.zoom,
        output.len()
    );

    (StatusCode::OK, Json(output))
}
