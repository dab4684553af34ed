//! Baltic Sea region lookups.
//!
//! Point membership tests against the region asset (with a bounding box
//! fallback) and the inverse mask used to dim everything outside it.

mod asset;
mod classifier;
mod mask;
mod ring;

pub use asset::{load_region, RegionSource};
pub use classifier::{
    classify, is_in_bounding_box, is_in_region, BoundingBox, Classification, BALTIC_BOUNDS,
};
pub use mask::{build_mask, MaskPolygon, WORLD_SHELL};
pub use ring::point_in_ring;
