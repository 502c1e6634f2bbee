pub mod session;

pub use session::{CaptureState, Measurement, PolygonCaptureSession};
