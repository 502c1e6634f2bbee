use crate::capture::CaptureState;

/// Errors raised by parcel geometry, capture and KML interchange.
///
/// Per-item variants (`InvalidRing`, `MissingCoordinates`) are recovered by the
/// batch operations and reported as skips; only `Parse` aborts a decode call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParcelError {
    #[error("ring needs at least 3 vertices, got {vertices}")]
    InvalidRing { vertices: usize },
    #[error("placemark has no <coordinates> element")]
    MissingCoordinates,
    #[error("failed to parse KML file: {0}")]
    Parse(String),
    #[error("cannot {action} while capture is {state}")]
    InvalidTransition {
        action: &'static str,
        state: CaptureState,
    },
    #[error("vertex index {index} out of range for ring of {len} vertices")]
    VertexOutOfRange { index: usize, len: usize },
    #[error("vertex ({lat}, {lng}) has non-finite coordinates")]
    InvalidPoint { lat: f64, lng: f64 },
}
