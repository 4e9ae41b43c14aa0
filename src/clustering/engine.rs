use super::types::*;
use crate::config::ClusterConfig;

use std::collections::HashMap;

/// Stateless; holds only thresholds, so one instance can serve every render pass.
#[derive(Debug, Clone, Default)]
pub struct ClusterRouter {
    config: ClusterConfig,
}

impl ClusterRouter {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Routes with the configured grid size.
    pub fn compute(&self, points: &[PointOfInterest], zoom: f64) -> ClusterOutput {
        self.compute_with_grid(points, zoom, self.config.grid_size)
    }

    /// Individual markers at or above the zoom threshold, grid clusters below it.
    ///
    /// Output order follows input order (markers) or first-seen cell order
    /// (clusters), so the same input always yields the same output.
    pub fn compute_with_grid(
        &self,
        points: &[PointOfInterest],
        zoom: f64,
        grid_size: f64,
    ) -> ClusterOutput {
        if zoom >= self.config.zoom_threshold {
            return ClusterOutput::Markers(self.markers(points, zoom));
        }

        let grid_size = if grid_size.is_finite() && grid_size > 0.0 {
            grid_size
        } else {
            tracing::warn!(
                "Invalid grid size {}, using {}",
                grid_size,
                self.config.grid_size
            );
            self.config.grid_size
        };

        ClusterOutput::Clusters(cluster_by_grid(points, grid_size))
    }

    fn markers(&self, points: &[PointOfInterest], zoom: f64) -> Vec<MarkerDescriptor> {
        let style = MarkerStyle::for_zoom(zoom, self.config.pin_detail_zoom);

        points
            .iter()
            .filter_map(|point| {
                let position = point.coordinate()?;
                Some(MarkerDescriptor {
                    id: point.id.clone(),
                    position,
                    tier: ColorTier::from_occupancy(point.occupancy_percentage),
                    style,
                    occupancy_percentage: point.occupancy_percentage,
                })
            })
            .collect()
    }
}

/// Buckets points into fixed-size grid cells. Points without coordinates are skipped.
pub fn cluster_by_grid(points: &[PointOfInterest], grid_size: f64) -> Vec<ClusterDescriptor> {
    let mut clusters: Vec<ClusterDescriptor> = Vec::new();
    let mut cell_index: HashMap<CellKey, usize> = HashMap::new();

    for point in points {
        let Some(coordinate) = point.coordinate() else {
            tracing::trace!("Skipping point {} without coordinates", point.id);
            continue;
        };

        let cell = CellKey::for_coordinate(coordinate, grid_size);
        match cell_index.get(&cell) {
            Some(&index) => {
                let cluster = &mut clusters[index];
                cluster.count += 1;
                cluster.members.push(point.clone());
            }
            None => {
                cell_index.insert(cell, clusters.len());
                clusters.push(ClusterDescriptor {
                    cell,
                    anchor: coordinate,
                    count: 1,
                    members: vec![point.clone()],
                });
            }
        }
    }

    clusters
}

/// Routes with the default thresholds (cluster below zoom 14, detail pins from 15).
pub fn compute_clusters(points: &[PointOfInterest], zoom: f64, grid_size: f64) -> ClusterOutput {
    ClusterRouter::default().compute_with_grid(points, zoom, grid_size)
}
