use geo::GeodesicArea;
use geo::orient::{Direction, Orient};

use crate::domain::Ring;

/// Mean earth radius used by the spherical-excess formula
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Parcel area in hectares using the spherical-excess approximation.
///
/// For each edge `(i, i+1 mod n)` accumulates
/// `(lng2 - lng1) * (2 + sin(lat1) + sin(lat2))` in radians, then scales by
/// `R² / 2`. Accurate for parcel-scale polygons (tens of hectares); this is
/// not a geodesic algorithm. See [`geodesic_area_hectares`] for that.
///
/// Degenerate rings (fewer than 3 vertices) return `0.0`.
pub fn area_hectares(ring: &Ring) -> f64 {
    if ring.is_degenerate() {
        return 0.0;
    }

    let sum: f64 = ring
        .edges()
        .map(|(p1, p2)| {
            let lat1 = p1.lat.to_radians();
            let lat2 = p2.lat.to_radians();
            let d_lng = (p2.lng - p1.lng).to_radians();
            d_lng * (2.0 + lat1.sin() + lat2.sin())
        })
        .sum();

    let square_meters = (sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs();
    square_meters / SQUARE_METERS_PER_HECTARE
}

/// Parcel area in hectares on the WGS84 ellipsoid.
///
/// This is the area the interactive drawing tool displays. It is a distinct
/// operation from [`area_hectares`] and the two can differ slightly; stored
/// and exported areas always use [`area_hectares`].
pub fn geodesic_area_hectares(ring: &Ring) -> f64 {
    if ring.is_degenerate() {
        return 0.0;
    }

    let polygon = ring.to_polygon().orient(Direction::Default);
    polygon.geodesic_area_unsigned() / SQUARE_METERS_PER_HECTARE
}
