//! Polygon containment for lasso selection.
//!
//! Vertices are (latitude, longitude) pairs treated as planar coordinates.
//! The test is the even-odd ray-casting rule with half-open edges; a point
//! lying exactly on an edge or vertex may resolve either way.

use serde::{Deserialize, Serialize};

/// Even-odd ray-casting test of `(lat, lng)` against `polygon`.
///
/// Polygons with fewer than three vertices contain nothing. Non-finite
/// query points are never inside.
pub fn point_in_polygon(lat: f64, lng: f64, polygon: &[(f64, f64)]) -> bool {
    if polygon.len() < 3 || !lat.is_finite() || !lng.is_finite() {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];

        let crosses = (yi > lng) != (yj > lng);
        if crosses && lat < (xj - xi) * (lng - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// A closed selection polygon.
///
/// The closing edge from the last vertex back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<(f64, f64)>,
}

impl Polygon {
    /// Creates a polygon from (latitude, longitude) vertices.
    pub fn new(vertices: Vec<(f64, f64)>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// A polygon needs at least three vertices to enclose anything.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        point_in_polygon(lat, lng, &self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]
    }

    #[test]
    fn test_inside_and_outside_square() {
        assert!(point_in_polygon(1.0, 1.0, &square()));
        assert!(!point_in_polygon(10.0, 10.0, &square()));
        assert!(!point_in_polygon(-0.5, 1.0, &square()));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape open towards high latitude
        let u = vec![
            (0.0, 0.0),
            (0.0, 3.0),
            (3.0, 3.0),
            (3.0, 2.0),
            (1.0, 2.0),
            (1.0, 1.0),
            (3.0, 1.0),
            (3.0, 0.0),
        ];
        assert!(point_in_polygon(0.5, 1.5, &u));
        assert!(point_in_polygon(2.0, 0.5, &u));
        assert!(!point_in_polygon(2.0, 1.5, &u));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        assert!(!point_in_polygon(0.0, 0.0, &[]));
        assert!(!point_in_polygon(0.5, 0.5, &[(0.0, 0.0), (1.0, 1.0)]));
        assert!(Polygon::new(vec![(0.0, 0.0)]).is_degenerate());
    }

    #[test]
    fn test_non_finite_point_is_outside() {
        assert!(!point_in_polygon(f64::NAN, 1.0, &square()));
    }

    #[test]
    fn test_vertex_order_does_not_matter() {
        let mut reversed = square();
        reversed.reverse();
        assert!(point_in_polygon(1.0, 1.0, &reversed));
        assert!(!point_in_polygon(3.0, 1.0, &reversed));
    }

    #[test]
    fn test_polygon_wrapper() {
        let polygon = Polygon::new(square());
        assert_eq!(polygon.vertices().len(), 4);
        assert!(!polygon.is_degenerate());
        assert!(polygon.contains(1.0, 1.0));
        assert!(!polygon.contains(10.0, 10.0));
    }
}
