use std::fmt;

use crate::domain::{MIN_RING_VERTICES, Point, Ring};
use crate::error::ParcelError;
use crate::geometry::{area_hectares, centroid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Empty,
    Drawing,
    Finalized,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureState::Empty => "empty",
            CaptureState::Drawing => "drawing",
            CaptureState::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Live feedback after each edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub area_hectares: f64,
    pub centroid: Option<Point>,
}

/// Interactive editing of one parcel boundary.
///
/// One session edits one parcel; concurrent edits use separate sessions.
/// Every mutating call recomputes area and centroid and returns them.
#[derive(Debug, Clone)]
pub struct PolygonCaptureSession {
    state: CaptureState,
    ring: Ring,
    area_hectares: f64,
    centroid: Option<Point>,
}

impl Default for PolygonCaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PolygonCaptureSession {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Empty,
            ring: Ring::default(),
            area_hectares: 0.0,
            centroid: None,
        }
    }

    /// Open an existing parcel boundary, ready for `edit()`
    pub fn from_ring(ring: Ring) -> Result<Self, ParcelError> {
        if ring.is_degenerate() {
            return Err(ParcelError::InvalidRing {
                vertices: ring.len(),
            });
        }
        if let Some(p) = ring.iter().find(|p| !p.is_finite()) {
            return Err(ParcelError::InvalidPoint {
                lat: p.lat,
                lng: p.lng,
            });
        }
        let mut session = Self {
            state: CaptureState::Finalized,
            ring,
            area_hectares: 0.0,
            centroid: None,
        };
        session.recompute();
        Ok(session)
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn measurement(&self) -> Measurement {
        Measurement {
            area_hectares: self.area_hectares,
            centroid: self.centroid,
        }
    }

    /// Begin a new boundary, discarding any previous ring
    pub fn start_draw(&mut self) -> Measurement {
        self.ring = Ring::default();
        self.state = CaptureState::Drawing;
        self.recompute()
    }

    pub fn add_vertex(&mut self, point: Point) -> Result<Measurement, ParcelError> {
        self.require(CaptureState::Drawing, "add a vertex")?;
        check_point(point)?;
        self.ring.points_mut().push(point);
        Ok(self.recompute())
    }

    pub fn move_vertex(&mut self, index: usize, point: Point) -> Result<Measurement, ParcelError> {
        self.require(CaptureState::Drawing, "move a vertex")?;
        check_point(point)?;
        let len = self.ring.len();
        let slot = self
            .ring
            .points_mut()
            .get_mut(index)
            .ok_or(ParcelError::VertexOutOfRange { index, len })?;
        *slot = point;
        Ok(self.recompute())
    }

    pub fn remove_vertex(&mut self, index: usize) -> Result<Measurement, ParcelError> {
        self.require(CaptureState::Drawing, "remove a vertex")?;
        let len = self.ring.len();
        if index >= len {
            return Err(ParcelError::VertexOutOfRange { index, len });
        }
        self.ring.points_mut().remove(index);
        Ok(self.recompute())
    }

    /// Finish drawing. With fewer than 3 vertices the session stays in `Drawing`.
    pub fn close_ring(&mut self) -> Result<Measurement, ParcelError> {
        self.require(CaptureState::Drawing, "close the ring")?;
        // Clicking the first vertex again closes the ring; keep closure implicit
        self.ring.normalize();
        if self.ring.len() < MIN_RING_VERTICES {
            return Err(ParcelError::InvalidRing {
                vertices: self.ring.len(),
            });
        }
        self.state = CaptureState::Finalized;
        Ok(self.recompute())
    }

    /// Re-open a finalized ring for vertex edits
    pub fn edit(&mut self) -> Result<Measurement, ParcelError> {
        self.require(CaptureState::Finalized, "edit")?;
        self.state = CaptureState::Drawing;
        Ok(self.recompute())
    }

    pub fn clear(&mut self) -> Measurement {
        self.ring = Ring::default();
        self.state = CaptureState::Empty;
        self.recompute()
    }

    /// Hand the finalized ring to the caller and reset to `Empty`
    pub fn take_ring(&mut self) -> Result<Ring, ParcelError> {
        self.require(CaptureState::Finalized, "take the ring")?;
        let ring = std::mem::take(&mut self.ring);
        self.clear();
        Ok(ring)
    }

    fn require(&self, expected: CaptureState, action: &'static str) -> Result<(), ParcelError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ParcelError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }

    fn recompute(&mut self) -> Measurement {
        self.area_hectares = area_hectares(&self.ring);
        self.centroid = centroid(&self.ring);
        self.measurement()
    }
}

fn check_point(point: Point) -> Result<(), ParcelError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(ParcelError::InvalidPoint {
            lat: point.lat,
            lng: point.lng,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_square(session: &mut PolygonCaptureSession) {
        session.start_draw();
        for p in [
            Point::new(36.0, 3.0),
            Point::new(36.0, 3.01),
            Point::new(36.01, 3.01),
            Point::new(36.01, 3.0),
        ] {
            session.add_vertex(p).unwrap();
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = PolygonCaptureSession::new();
        assert_eq!(session.state(), CaptureState::Empty);
        assert_eq!(session.measurement().area_hectares, 0.0);
        assert_eq!(session.measurement().centroid, None);
    }

    #[test]
    fn test_add_vertex_requires_drawing() {
        let mut session = PolygonCaptureSession::new();
        let err = session.add_vertex(Point::new(36.0, 3.0)).unwrap_err();
        assert_eq!(
            err,
            ParcelError::InvalidTransition {
                action: "add a vertex",
                state: CaptureState::Empty
            }
        );
    }

    #[test]
    fn test_live_feedback_while_drawing() {
        let mut session = PolygonCaptureSession::new();
        session.start_draw();
        let m1 = session.add_vertex(Point::new(36.0, 3.0)).unwrap();
        let m2 = session.add_vertex(Point::new(36.0, 3.01)).unwrap();
        assert_eq!(m1.area_hectares, 0.0);
        assert_eq!(m2.centroid, None);

        let m3 = session.add_vertex(Point::new(36.01, 3.01)).unwrap();
        assert!(m3.area_hectares > 0.0);
        assert!(m3.centroid.is_some());
    }

    #[test]
    fn test_close_ring_with_too_few_vertices_stays_drawing() {
        let mut session = PolygonCaptureSession::new();
        session.start_draw();
        session.add_vertex(Point::new(36.0, 3.0)).unwrap();
        session.add_vertex(Point::new(36.0, 3.01)).unwrap();

        let err = session.close_ring().unwrap_err();
        assert_eq!(err, ParcelError::InvalidRing { vertices: 2 });
        assert_eq!(session.state(), CaptureState::Drawing);
        assert_eq!(session.ring().len(), 2);
    }

    #[test]
    fn test_close_ring_drops_repeated_first_vertex() {
        let mut session = PolygonCaptureSession::new();
        draw_square(&mut session);
        session.add_vertex(Point::new(36.0, 3.0)).unwrap();
        assert_eq!(session.ring().len(), 5);

        session.close_ring().unwrap();
        assert_eq!(session.ring().len(), 4);

        session.start_draw();
        session.add_vertex(Point::new(36.0, 3.0)).unwrap();
        session.add_vertex(Point::new(36.0, 3.01)).unwrap();
        session.add_vertex(Point::new(36.0, 3.0)).unwrap();
        let err = session.close_ring().unwrap_err();
        assert_eq!(err, ParcelError::InvalidRing { vertices: 2 });
        assert_eq!(session.state(), CaptureState::Drawing);
    }

    #[test]
    fn test_finalize_edit_and_move() {
        let mut session = PolygonCaptureSession::new();
        draw_square(&mut session);
        let closed = session.close_ring().unwrap();
        assert_eq!(session.state(), CaptureState::Finalized);

        assert!(session.add_vertex(Point::new(36.02, 3.0)).is_err());

        session.edit().unwrap();
        assert_eq!(session.state(), CaptureState::Drawing);
        let moved = session.move_vertex(2, Point::new(36.02, 3.02)).unwrap();
        assert!(moved.area_hectares > closed.area_hectares);

        let err = session.move_vertex(9, Point::new(0.0, 0.0)).unwrap_err();
        assert_eq!(err, ParcelError::VertexOutOfRange { index: 9, len: 4 });
    }

    #[test]
    fn test_remove_vertex_recomputes() {
        let mut session = PolygonCaptureSession::new();
        draw_square(&mut session);
        let m = session.remove_vertex(3).unwrap();
        assert_eq!(session.ring().len(), 3);
        assert!(m.area_hectares > 0.0);

        session.remove_vertex(0).unwrap();
        assert_eq!(session.measurement().area_hectares, 0.0);
        assert_eq!(session.measurement().centroid, None);
    }

    #[test]
    fn test_start_draw_discards_previous_ring() {
        let mut session = PolygonCaptureSession::new();
        draw_square(&mut session);
        session.close_ring().unwrap();

        let m = session.start_draw();
        assert_eq!(session.state(), CaptureState::Drawing);
        assert!(session.ring().is_empty());
        assert_eq!(m.area_hectares, 0.0);
    }

    #[test]
    fn test_clear_from_any_state() {
        let mut session = PolygonCaptureSession::new();
        draw_square(&mut session);
        session.clear();
        assert_eq!(session.state(), CaptureState::Empty);
        assert!(session.ring().is_empty());
    }

    #[test]
    fn test_rejects_non_finite_vertex() {
        let mut session = PolygonCaptureSession::new();
        session.start_draw();
        let err = session.add_vertex(Point::new(f64::NAN, 3.0)).unwrap_err();
        assert!(matches!(err, ParcelError::InvalidPoint { .. }));
        assert!(session.ring().is_empty());
    }

    #[test]
    fn test_take_ring_resets_session() {
        let mut session = PolygonCaptureSession::new();
        draw_square(&mut session);
        assert!(session.take_ring().is_err());

        session.close_ring().unwrap();
        let ring = session.take_ring().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(session.state(), CaptureState::Empty);
    }

    #[test]
    fn test_from_ring_opens_finalized() {
        let ring = Ring::new(vec![
            Point::new(36.0, 3.0),
            Point::new(36.0, 3.01),
            Point::new(36.01, 3.01),
        ]);
        let mut session = PolygonCaptureSession::from_ring(ring).unwrap();
        assert_eq!(session.state(), CaptureState::Finalized);
        assert!(session.measurement().area_hectares > 0.0);
        session.edit().unwrap();

        assert_eq!(
            PolygonCaptureSession::from_ring(Ring::default()).unwrap_err(),
            ParcelError::InvalidRing { vertices: 0 }
        );
    }
}
