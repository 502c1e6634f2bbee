use geo::Centroid;

use crate::domain::{Point, Ring};

/// Representative point of a ring for marker placement and reverse geocoding.
///
/// Computes the area-weighted centroid treating lat/lng as planar, which stays
/// close to the parcel at parcel scale. Zero-area rings (collinear vertices)
/// fall back to the centroid of their outline. Degenerate rings yield `None`.
pub fn centroid(ring: &Ring) -> Option<Point> {
    if ring.is_degenerate() {
        return None;
    }
    ring.to_polygon().centroid().map(Point::from)
}
