//! Inverse mask polygon: the whole world with the region carved out.

use crate::models::{Geometry, LatLng, RegionFeatureCollection, Ring};

/// World-covering shell in (lat, lng) order
pub const WORLD_SHELL: [LatLng; 5] = [
    LatLng::new(-90.0, -180.0),
    LatLng::new(-90.0, 180.0),
    LatLng::new(90.0, 180.0),
    LatLng::new(90.0, -180.0),
    LatLng::new(-90.0, -180.0),
];

/// Polygon-with-holes in (lat, lng) order: the first ring is [`WORLD_SHELL`],
/// every following ring is a hole.
pub type MaskPolygon = Vec<Vec<LatLng>>;

/// Build the dimming mask for a region asset.
///
/// Every ring of the primary geometry becomes a hole, shells and holes alike.
/// Returns `None` when there is no geometry to carve out or its type is not
/// a polygon type.
pub fn build_mask(region: Option<&RegionFeatureCollection>) -> Option<MaskPolygon> {
    let geometry = region?.primary_geometry()?;

    if matches!(geometry, Geometry::Other) {
        return None;
    }

    let mut mask = vec![WORLD_SHELL.to_vec()];
    mask.extend(geometry.all_rings().map(swap_ring));
    Some(mask)
}

fn swap_ring(ring: &Ring) -> Vec<LatLng> {
    ring.iter().copied().map(LatLng::from).collect()
}
