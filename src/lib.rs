//! parcelkml - Land-parcel geometry and KML interchange for farm boundaries

pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod kml;

pub use capture::{CaptureState, Measurement, PolygonCaptureSession};
pub use domain::{LandParcel, OwnerRef, ParcelDraft, ParcelRecord, Point, Ring, SizeTier};
pub use error::ParcelError;
pub use geometry::{area_hectares, centroid, geodesic_area_hectares};
pub use kml::{KmlEncoder, decode, encode};
