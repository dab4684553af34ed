//! GeoJSON-like region asset.
//!
//! Only the parts of GeoJSON the region lookups consult are modelled: a feature
//! collection whose first feature carries a `Polygon` or `MultiPolygon` geometry.
//! Every other geometry type is accepted and kept as [`Geometry::Other`].

use geo::BoundingRect;
use geo_types::{Coord, LineString, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// GeoJSON position, stored in `[lng, lat]` order.
///
/// Extra ordinates (altitude) are dropped on parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        match v.as_slice() {
            [lng, lat, ..] => Ok(Self {
                lng: *lng,
                lat: *lat,
            }),
            _ => Err(format!("position needs at least 2 ordinates, got {}", v.len())),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lng, p.lat]
    }
}

impl From<Position> for Coord<f64> {
    fn from(p: Position) -> Self {
        Coord { x: p.lng, y: p.lat }
    }
}

/// Implicitly closed sequence of positions
pub type Ring = Vec<Position>;

/// Feature geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Shell followed by holes
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    /// Any geometry type the region lookups do not understand
    #[serde(other)]
    Other,
}

impl Geometry {
    /// GeoJSON type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::Other => "Other",
        }
    }

    /// Exterior ring of every polygon, in order.
    ///
    /// Polygons with no rings at all contribute nothing.
    pub fn exterior_rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        let polygons: &[Vec<Ring>] = match self {
            Geometry::Polygon { coordinates } => std::slice::from_ref(coordinates),
            Geometry::MultiPolygon { coordinates } => coordinates,
            Geometry::Other => &[],
        };
        polygons.iter().filter_map(|rings| rings.first())
    }

    /// Every ring of every polygon, shells and holes alike
    pub fn all_rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        let polygons: &[Vec<Ring>] = match self {
            Geometry::Polygon { coordinates } => std::slice::from_ref(coordinates),
            Geometry::MultiPolygon { coordinates } => coordinates,
            Geometry::Other => &[],
        };
        polygons.iter().flatten()
    }

    /// Convert to a `geo` multipolygon (first ring shell, rest interiors)
    pub fn to_multi_polygon(&self) -> Option<MultiPolygon<f64>> {
        let polygons: &[Vec<Ring>] = match self {
            Geometry::Polygon { coordinates } => std::slice::from_ref(coordinates),
            Geometry::MultiPolygon { coordinates } => coordinates,
            Geometry::Other => return None,
        };

        let converted: Vec<Polygon<f64>> = polygons
            .iter()
            .filter_map(|rings| {
                let (shell, holes) = rings.split_first()?;
                Some(Polygon::new(
                    to_line_string(shell),
                    holes.iter().map(|r| to_line_string(r)).collect(),
                ))
            })
            .collect();

        if converted.is_empty() {
            return None;
        }

        Some(MultiPolygon::new(converted))
    }
}

fn to_line_string(ring: &[Position]) -> LineString<f64> {
    LineString::new(ring.iter().copied().map(Coord::from).collect())
}

/// Single feature; only the geometry is consulted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

/// Region asset loaded once at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionFeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl RegionFeatureCollection {
    /// Collection holding a single feature with the given geometry
    pub fn from_geometry(geometry: Geometry) -> Self {
        Self {
            features: vec![Feature {
                geometry: Some(geometry),
                properties: None,
            }],
        }
    }

    /// Parse from GeoJSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Geometry of the first feature. Additional features are ignored.
    pub fn primary_geometry(&self) -> Option<&Geometry> {
        self.features.first()?.geometry.as_ref()
    }

    /// Envelope of the primary geometry, as (lng, lat) min/max corners
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.primary_geometry()?.to_multi_polygon()?.bounding_rect()
    }
}
