pub mod area;
pub mod centroid;

pub use area::{EARTH_RADIUS_M, area_hectares, geodesic_area_hectares};
pub use centroid::centroid;
