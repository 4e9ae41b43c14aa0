use serde::{Deserialize, Serialize};

/// A venue to place on the map.
///
/// Coordinates are optional because upstream data is not always geocoded; a
/// point without both coordinates is never rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointOfInterest {
    pub id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// 0-100, drives the marker color tier.
    #[serde(default)]
    pub occupancy_percentage: f64,
}

impl PointOfInterest {
    /// Both coordinates, if present and finite.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Some(Coordinate {
                    latitude,
                    longitude,
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Hot,
    Warm,
    Cool,
}

impl ColorTier {
    pub fn from_occupancy(occupancy_percentage: f64) -> Self {
        if occupancy_percentage >= 90.0 {
            ColorTier::Hot
        } else if occupancy_percentage >= 50.0 {
            ColorTier::Warm
        } else {
            ColorTier::Cool
        }
    }
}

/// How an individual marker is drawn. Purely a hint for the rendering layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    Detailed,
    Dot,
}

impl MarkerStyle {
    pub fn for_zoom(zoom: f64, pin_detail_zoom: f64) -> Self {
        if zoom >= pin_detail_zoom {
            MarkerStyle::Detailed
        } else {
            MarkerStyle::Dot
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerDescriptor {
    pub id: String,
    pub position: Coordinate,
    pub tier: ColorTier,
    pub style: MarkerStyle,
    pub occupancy_percentage: f64,
}

/// Grid cell index: `floor(lat / grid)`, `floor(lng / grid)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub lat_index: i64,
    pub lng_index: i64,
}

impl CellKey {
    pub fn for_coordinate(coordinate: Coordinate, grid_size: f64) -> Self {
        Self {
            lat_index: (coordinate.latitude / grid_size).floor() as i64,
            lng_index: (coordinate.longitude / grid_size).floor() as i64,
        }
    }
}

/// All points sharing one grid cell at the current zoom.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterDescriptor {
    pub cell: CellKey,
    /// Coordinate of the first member assigned to the cell.
    pub anchor: Coordinate,
    pub count: usize,
    pub members: Vec<PointOfInterest>,
}

/// Router output: either individual markers or clusters, never a mix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum ClusterOutput {
    Markers(Vec<MarkerDescriptor>),
    Clusters(Vec<ClusterDescriptor>),
}

impl ClusterOutput {
    /// Number of markers the rendering layer will place.
    pub fn len(&self) -> usize {
        match self {
            ClusterOutput::Markers(markers) => markers.len(),
            ClusterOutput::Clusters(clusters) => clusters.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterRequest {
    pub points: Vec<PointOfInterest>,
    pub zoom: f64,
    #[serde(default)]
    pub grid_size: Option<f64>,
}
