//! Even-odd ray casting over a single ring.

use crate::models::{LatLng, Position};

/// Test whether `point` lies inside `ring`.
///
/// The ring is implicitly closed; an explicit closing vertex changes nothing.
/// Comparisons are exact, so points lying exactly on an edge may land on
/// either side. Rings with fewer than three vertices never contain anything.
pub fn point_in_ring(point: LatLng, ring: &[Position]) -> bool {
    // Opposite edges of a two-point ring need not round to the same crossing
    if ring.len() < 3 {
        return false;
    }

    let LatLng { lat, lng } = point;
    let mut inside = false;
    let mut prev = &ring[ring.len() - 1];

    for cur in ring {
        let (xi, yi) = (cur.lng, cur.lat);
        let (xj, yj) = (prev.lng, prev.lat);

        // Straddle check guarantees yi != yj before dividing
        if (yi > lat) != (yj > lat) && lng < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }

        prev = cur;
    }

    inside
}
