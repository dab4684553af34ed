//! Baltic region services for the climate map.
//!
//! This library provides the region membership test, the inverse mask polygon,
//! and the forecast heat grid shared by the `region-server` and `heatgrid`
//! binaries.

pub mod config;
pub mod error;
pub mod heat;
pub mod models;
pub mod ready;
pub mod region;

pub use models::{LatLng, RegionFeatureCollection};
