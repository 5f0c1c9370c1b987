//! Vector, point and box helpers on top of kurbo's value types.

use super::tol::Tolerance;
use kurbo::{Point, Rect, Vec2};

/// Extra vector queries used by the line relation functions.
pub trait VectorExt {
    /// Signed perpendicular distance of `other` from the line along `self`.
    ///
    /// Positive when `other` lies to the left of `self`. A zero-length
    /// `self` yields the length of `other`.
    fn distance_to_vector(self, other: Vec2) -> f64;

    /// Scale of the projection of `self` onto `onto` (0 at the origin, 1 at `onto`).
    fn project_scale_to_vector(self, onto: Vec2) -> f64;
}

impl VectorExt for Vec2 {
    fn distance_to_vector(self, other: Vec2) -> f64 {
        let len = self.hypot();
        if len < f64::EPSILON {
            return other.hypot();
        }
        self.cross(other) / len
    }

    fn project_scale_to_vector(self, onto: Vec2) -> f64 {
        let len_sq = onto.hypot2();
        if len_sq < f64::EPSILON {
            return 0.0;
        }
        self.dot(onto) / len_sq
    }
}

/// Check if two points coincide under the point tolerance.
pub fn points_equal(a: Point, b: Point, tol: &Tolerance) -> bool {
    a.distance(b) <= tol.point
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Bounding box of a set of points; the zero rectangle for an empty set.
pub fn extent_of(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

/// Square box of side `size` centred on `center`.
pub fn box_around(center: Point, size: f64) -> Rect {
    let half = size.abs() / 2.0;
    Rect::new(center.x - half, center.y - half, center.x + half, center.y + half)
}

/// Check if a box is degenerate under the point tolerance.
///
/// With `either_side` a box counts as empty when its width *or* height
/// collapses, otherwise only when both do.
pub fn box_is_empty(rect: Rect, tol: &Tolerance, either_side: bool) -> bool {
    let rect = rect.abs();
    let thin_x = rect.width() <= tol.point;
    let thin_y = rect.height() <= tol.point;
    if either_side {
        thin_x || thin_y
    } else {
        thin_x && thin_y
    }
}

/// Inclusive overlap test of two boxes (touching edges count).
pub fn boxes_overlap(a: Rect, b: Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Inclusive containment test of a point in a box.
pub fn box_contains(rect: Rect, pt: Point) -> bool {
    let rect = rect.abs();
    pt.x >= rect.x0 && pt.x <= rect.x1 && pt.y >= rect.y0 && pt.y <= rect.y1
}
