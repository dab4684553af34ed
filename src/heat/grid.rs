//! Heat grid geometry and normalization.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::HeatConfig;

/// Upper bound on samples along one grid axis
pub const MAX_AXIS_POINTS: usize = 10_000;

/// Sample in `[lat, lon, value]` form, the shape heatmap layers consume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub value: f64,
}

impl From<[f64; 3]> for HeatPoint {
    fn from([lat, lon, value]: [f64; 3]) -> Self {
        Self { lat, lon, value }
    }
}

impl From<HeatPoint> for [f64; 3] {
    fn from(p: HeatPoint) -> Self {
        [p.lat, p.lon, p.value]
    }
}

/// Grid positions, latitude-major, ends included when reached by stepping
pub fn grid_points(cfg: &HeatConfig) -> Vec<(f64, f64)> {
    let lats = axis(cfg.lat_start, cfg.lat_end, cfg.step);
    let lons = axis(cfg.lon_start, cfg.lon_end, cfg.step);

    lats.iter()
        .flat_map(|&lat| lons.iter().map(move |&lon| (lat, lon)))
        .collect()
}

/// Number of samples from `start` to `end`, or `None` when the axis is
/// empty or longer than [`MAX_AXIS_POINTS`]
pub fn axis_len(start: f64, end: f64, step: f64) -> Option<usize> {
    if !(step > 0.0) || !(end >= start) {
        return None;
    }
    // Small slack so 47.5 + 7 * 1.0 still counts as reaching 54.5
    let span = (end - start) / step + 1e-9;
    if !span.is_finite() || span >= MAX_AXIS_POINTS as f64 {
        return None;
    }
    Some(span.floor() as usize + 1)
}

fn axis(start: f64, end: f64, step: f64) -> Vec<f64> {
    let Some(count) = axis_len(start, end, step) else {
        if step > 0.0 && end >= start {
            warn!(
                "Grid axis {}..={} step {} exceeds {} points, skipping",
                start, end, step, MAX_AXIS_POINTS
            );
        }
        return Vec::new();
    };
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Rescale values to 0..1 over the sample's own min/max.
///
/// A flat sample (max == min) maps every value to 0.
pub fn normalize(points: &[HeatPoint]) -> Vec<HeatPoint> {
    let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);

    let range = if max - min == 0.0 { 1.0 } else { max - min };

    points
        .iter()
        .map(|p| HeatPoint {
            value: (p.value - min) / range,
            ..*p
        })
        .collect()
}
