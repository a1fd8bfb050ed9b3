//! Finite 2D line-segment primitive used by the matching engine.
//!
//! A segment is defined by two end points; the unit direction and length are
//! derived lazily and cached. The central operation is
//! [`LineSegment::nearest_point_on_infinite_line`], which projects a point
//! onto the infinite extension of the segment and reports both the projected
//! point and where the projection falls relative to the finite extent.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Result of projecting a point onto the infinite extension of a segment.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    /// Nearest point on the infinite line.
    pub point: Point2<f64>,
    /// Signed distance by which the projection leaves the finite segment:
    /// negative before `point0`, positive past `point1`, zero inside.
    pub out_of_boundary: f64,
    /// 1-D location of the projection along the segment, measured from
    /// `point0` so that `point0 + direction * location` is the projection.
    pub location: f64,
}

/// Finite 2D line segment over `f64` coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineSegment {
    p0: Point2<f64>,
    p1: Point2<f64>,
    #[serde(skip)]
    direction: OnceLock<Vector2<f64>>,
    #[serde(skip)]
    length: OnceLock<f64>,
}

impl LineSegment {
    pub fn new(p0: Point2<f64>, p1: Point2<f64>) -> Self {
        Self {
            p0,
            p1,
            direction: OnceLock::new(),
            length: OnceLock::new(),
        }
    }

    /// Convenience constructor from raw coordinates.
    pub fn from_coords(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    pub fn point0(&self) -> Point2<f64> {
        self.p0
    }

    pub fn point1(&self) -> Point2<f64> {
        self.p1
    }

    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.p0, &self.p1)
    }

    /// A segment is valid when its end points are finite and distinct.
    pub fn is_valid(&self) -> bool {
        let finite = self.p0.coords.iter().all(|c| c.is_finite())
            && self.p1.coords.iter().all(|c| c.is_finite());
        finite && self.p0 != self.p1
    }

    pub fn length(&self) -> f64 {
        *self
            .length
            .get_or_init(|| nalgebra::distance(&self.p0, &self.p1))
    }

    /// Unit direction from `point0` towards `point1`; zero for degenerate
    /// segments.
    pub fn direction(&self) -> Vector2<f64> {
        *self.direction.get_or_init(|| {
            let len = self.length();
            if len > 0.0 {
                (self.p1 - self.p0) / len
            } else {
                Vector2::zeros()
            }
        })
    }

    /// Unit normal, the direction rotated by 90 degrees counter-clockwise.
    pub fn normal(&self) -> Vector2<f64> {
        let dir = self.direction();
        Vector2::new(-dir.y, dir.x)
    }

    /// Projects `point` onto the infinite extension of this segment.
    pub fn nearest_point_on_infinite_line(&self, point: &Point2<f64>) -> Projection {
        let location = (point - self.p0).dot(&self.direction());

        let length = self.length();
        let out_of_boundary = if location < 0.0 {
            location
        } else if location > length {
            location - length
        } else {
            0.0
        };

        Projection {
            point: self.p0 + self.direction() * location,
            out_of_boundary,
            location,
        }
    }

    /// End-point equality within `eps`, accepting either orientation.
    pub fn is_equal(&self, other: &LineSegment, eps: f64) -> bool {
        let sqr_eps = eps * eps;

        let close = |a: &Point2<f64>, b: &Point2<f64>| nalgebra::distance_squared(a, b) <= sqr_eps;

        (close(&self.p0, &other.p0) && close(&self.p1, &other.p1))
            || (close(&self.p0, &other.p1) && close(&self.p1, &other.p0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn projection_inside_segment() {
        let line = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);

        let proj = line.nearest_point_on_infinite_line(&Point2::new(4.0, 3.0));
        assert!((proj.location - 4.0).abs() < EPS);
        assert!(proj.out_of_boundary.abs() < EPS);
        assert!((proj.point - Point2::new(4.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn projection_outside_segment() {
        let line = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);

        let before = line.nearest_point_on_infinite_line(&Point2::new(-3.0, 1.0));
        assert!((before.location - -3.0).abs() < EPS);
        assert!((before.out_of_boundary - -3.0).abs() < EPS);

        let past = line.nearest_point_on_infinite_line(&Point2::new(14.0, -2.0));
        assert!((past.location - 14.0).abs() < EPS);
        assert!((past.out_of_boundary - 4.0).abs() < EPS);
    }

    #[test]
    fn endpoints_project_onto_themselves() {
        let line = LineSegment::from_coords(1.0, 2.0, 4.0, 6.0);

        let at0 = line.nearest_point_on_infinite_line(&line.point0());
        assert!(at0.location.abs() < EPS);
        assert!(at0.out_of_boundary.abs() < EPS);

        let at1 = line.nearest_point_on_infinite_line(&line.point1());
        assert!((at1.location - line.length()).abs() < EPS);
        assert!(at1.out_of_boundary.abs() < EPS);
    }

    #[test]
    fn normal_is_perpendicular_unit_vector() {
        let line = LineSegment::from_coords(2.0, 1.0, 8.0, 9.0);

        let normal = line.normal();
        assert!(normal.dot(&line.direction()).abs() < EPS);
        assert!((normal.norm() - 1.0).abs() < EPS);

        assert!((line.midpoint() - Point2::new(5.0, 5.0)).norm() < EPS);
    }

    #[test]
    fn is_equal_accepts_flipped_orientation() {
        let line = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        let flipped = LineSegment::from_coords(10.0, 0.5, 0.0, -0.5);

        assert!(line.is_equal(&flipped, 1.0));
        assert!(!line.is_equal(&flipped, 0.1));
    }

    #[test]
    fn degenerate_segment_is_invalid() {
        assert!(!LineSegment::from_coords(3.0, 3.0, 3.0, 3.0).is_valid());
        assert!(!LineSegment::from_coords(0.0, f64::NAN, 1.0, 1.0).is_valid());
        assert!(LineSegment::from_coords(0.0, 0.0, 1.0, 1.0).is_valid());
    }
}
