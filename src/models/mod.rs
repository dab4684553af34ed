//! Core data models for region lookups.

pub mod geojson;
pub mod point;

pub use geojson::{Feature, Geometry, Position, RegionFeatureCollection, Ring};
pub use point::LatLng;
