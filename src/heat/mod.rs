//! Temperature heat grid for the map overlay.
//!
//! Samples the current-hour forecast temperature on a regular lat/lon grid
//! and normalizes it to 0..1 intensities.

mod fetcher;
mod grid;

pub use fetcher::{current_hour_key, select_hour_index, HeatFetcher};
pub use grid::{axis_len, grid_points, normalize, HeatPoint, MAX_AXIS_POINTS};
