//! Baltic Sea membership test.
//!
//! Uses the region asset when one is available and falls back to a fixed
//! bounding box otherwise. Missing or unsupported data never fails; it only
//! makes the answer less precise.

use serde::Serialize;

use super::point_in_ring;
use crate::models::{Geometry, LatLng, RegionFeatureCollection};

/// Fixed lat/lng envelope of the Baltic Sea, inclusive on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }
}

/// Southern Denmark to northern Finland, western Denmark to eastern Finland
pub const BALTIC_BOUNDS: BoundingBox = BoundingBox {
    south: 53.5,
    north: 66.0,
    west: 9.0,
    east: 30.0,
};

/// Which data decided a membership answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Polygon,
    MultiPolygon,
    BoundingBox,
}

pub fn is_in_bounding_box(point: LatLng) -> bool {
    BALTIC_BOUNDS.contains(point)
}

/// Test whether `point` is inside the region.
///
/// Only the first feature is consulted. Polygon holes are ignored: each
/// polygon is reduced to its exterior ring.
pub fn is_in_region(point: LatLng, region: Option<&RegionFeatureCollection>) -> bool {
    classify(point, region).0
}

/// Same as [`is_in_region`], also reporting which data made the decision
pub fn classify(point: LatLng, region: Option<&RegionFeatureCollection>) -> (bool, Classification) {
    let geometry = region.and_then(RegionFeatureCollection::primary_geometry);

    let method = match geometry {
        Some(Geometry::Polygon { .. }) => Classification::Polygon,
        Some(Geometry::MultiPolygon { .. }) => Classification::MultiPolygon,
        Some(Geometry::Other) | None => {
            return (is_in_bounding_box(point), Classification::BoundingBox);
        }
    };

    let inside = geometry
        .into_iter()
        .flat_map(Geometry::exterior_rings)
        .any(|ring| point_in_ring(point, ring));

    (inside, method)
}
