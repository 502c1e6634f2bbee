use serde::{Deserialize, Serialize};

/// Minimum vertex count for a ring to carry any area
pub const MIN_RING_VERTICES: usize = 3;

/// A WGS84 position in degrees. Altitude is not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// The only place lat/lng become planar x/y for the `geo` algorithms.
impl From<Point> for geo::Coord<f64> {
    fn from(p: Point) -> Self {
        geo::coord! { x: p.lng, y: p.lat }
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(p: geo::Point<f64>) -> Self {
        Self {
            lat: p.y(),
            lng: p.x(),
        }
    }
}

/// Polygon boundary in vertex order.
///
/// The last vertex connects implicitly to the first; the closing vertex is
/// never stored twice. Every constructor (including deserialization) drops an
/// explicit closing vertex. Rings under [`MIN_RING_VERTICES`] are degenerate
/// and treated as "no geometry".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Point>", into = "Vec<Point>")]
pub struct Ring(Vec<Point>);

impl Ring {
    pub fn new(points: Vec<Point>) -> Self {
        let mut ring = Self(points);
        ring.normalize();
        ring
    }

    /// Drop a trailing vertex that repeats the first
    pub(crate) fn normalize(&mut self) {
        if self.0.len() > 1 && self.0.first() == self.0.last() {
            self.0.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_degenerate(&self) -> bool {
        self.0.len() < MIN_RING_VERTICES
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }

    pub(crate) fn points_mut(&mut self) -> &mut Vec<Point> {
        &mut self.0
    }

    /// Consecutive edges including the implicit closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.0.len();
        (0..n).map(move |i| (self.0[i], self.0[(i + 1) % n]))
    }

    /// Planar polygon with x = lng, y = lat
    pub fn to_polygon(&self) -> geo::Polygon<f64> {
        let exterior: geo::LineString<f64> = self.0.iter().map(|&p| geo::Coord::from(p)).collect();
        geo::Polygon::new(exterior, vec![])
    }
}

impl From<Vec<Point>> for Ring {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl From<Ring> for Vec<Point> {
    fn from(ring: Ring) -> Self {
        ring.0
    }
}

impl FromIterator<Point> for Ring {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Ring {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_rings() {
        assert!(Ring::default().is_degenerate());
        assert!(Ring::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).is_degenerate());
        assert!(
            !Ring::new(vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(1.0, 1.0)
            ])
            .is_degenerate()
        );
    }

    #[test]
    fn test_edges_close_implicitly() {
        let ring = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        ]);
        let edges: Vec<_> = ring.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Point::new(1.0, 1.0), Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_coord_conversion_swaps_axes() {
        let coord: geo::Coord<f64> = Point::new(36.5, 3.25).into();
        assert_eq!(coord.x, 3.25);
        assert_eq!(coord.y, 36.5);
    }

    #[test]
    fn test_explicit_closing_vertex_is_dropped() {
        let a = Point::new(36.0, 3.0);
        let ring = Ring::new(vec![a, Point::new(36.0, 3.01), Point::new(36.01, 3.01), a]);
        assert_eq!(ring.len(), 3);
        assert!(!ring.is_degenerate());

        let line = Ring::new(vec![a, Point::new(36.0, 3.01), a]);
        assert_eq!(line.len(), 2);
        assert!(line.is_degenerate());

        assert_eq!(Ring::new(vec![a]).len(), 1);
    }

    #[test]
    fn test_deserialized_ring_is_normalized() {
        let json = r#"[{"lat":0.0,"lng":0.0},{"lat":0.0,"lng":1.0},{"lat":1.0,"lng":1.0},{"lat":0.0,"lng":0.0}]"#;
        let ring: Ring = serde_json::from_str(json).unwrap();
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn test_ring_serializes_as_point_array() {
        let ring = Ring::new(vec![Point::new(36.0, 3.0)]);
        let json = serde_json::to_string(&ring).unwrap();
        assert_eq!(json, r#"[{"lat":36.0,"lng":3.0}]"#);
    }
}
