//! Query point in map (lat, lng) order.

use serde::{Deserialize, Serialize};

use super::Position;

/// Geographic point in (lat, lng) order.
///
/// Serialized as `[lat, lng]`, the ordering Leaflet expects for polygon positions.
/// No range validation is performed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

impl From<Position> for LatLng {
    fn from(p: Position) -> Self {
        Self {
            lat: p.lat,
            lng: p.lng,
        }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_lat_first() {
        let p = LatLng::new(58.0, 20.0);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[58.0,20.0]");
    }

    #[test]
    fn test_from_position_swaps_order() {
        let pos = Position { lng: 20.0, lat: 58.0 };
        assert_eq!(LatLng::from(pos), LatLng::new(58.0, 20.0));
    }
}
