//! Relations between points, segments and lines.
//!
//! "Line" means the bounded segment between two points, "beeline" the
//! unbounded line through them. Every function accepts degenerate input
//! (coincident points, parallel lines) and reports it through its return
//! value instead of panicking.

use super::tol::{Tolerance, ZERO_EPSILON, approx_eq, is_zero};
use super::vector::VectorExt;
use kurbo::Point;

/// Intersection of two lines with the interpolation parameters on each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCross {
    /// The crossing point.
    pub point: Point,
    /// Parameter along `a→b` (0 at `a`, 1 at `b`).
    pub u: f64,
    /// Parameter along `c→d` (0 at `c`, 1 at `d`).
    pub v: f64,
}

/// Check if `pt` lies strictly left of the directed line `a→b`.
pub fn is_left(a: Point, b: Point, pt: Point) -> bool {
    (b - a).cross(pt - a) > 0.0
}

/// Check if `pt` lies left of `a→b` by more than the point tolerance.
pub fn is_left2(a: Point, b: Point, pt: Point, tol: &Tolerance) -> bool {
    (b - a).distance_to_vector(pt - a) > tol.point
}

/// Check if `pt` lies left of or on the directed line `a→b`.
pub fn is_left_on(a: Point, b: Point, pt: Point) -> bool {
    (b - a).cross(pt - a) >= 0.0
}

/// Check if `pt` lies left of `a→b` or closer than the point tolerance to it.
///
/// A zero tolerance makes this strict, like [`is_left2`].
pub fn is_left_on2(a: Point, b: Point, pt: Point, tol: &Tolerance) -> bool {
    (b - a).distance_to_vector(pt - a) > -tol.point
}

/// Check if `pt` lies on the beeline through `a` and `b`.
pub fn is_colinear(a: Point, b: Point, pt: Point) -> bool {
    is_zero((b - a).cross(pt - a))
}

/// Check if `pt` lies within the point tolerance of the beeline through `a` and `b`.
pub fn is_colinear2(a: Point, b: Point, pt: Point, tol: &Tolerance) -> bool {
    (b - a).distance_to_vector(pt - a).abs() <= tol.point
}

/// Check if segments `ab` and `cd` cross properly, at a single interior point.
pub fn is_intersect_prop(a: Point, b: Point, c: Point, d: Point) -> bool {
    if is_colinear(a, b, c) || is_colinear(a, b, d) || is_colinear(c, d, a) || is_colinear(c, d, b) {
        return false;
    }
    (is_left(a, b, c) ^ is_left(a, b, d)) && (is_left(c, d, a) ^ is_left(c, d, b))
}

/// Check if segments `ab` and `cd` intersect, including touching endpoints
/// and colinear overlap.
pub fn is_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    is_intersect_prop(a, b, c, d)
        || is_between_line(a, b, c)
        || is_between_line(a, b, d)
        || is_between_line(c, d, a)
        || is_between_line(c, d, b)
}

/// Check if `pt` lies exactly on segment `ab`.
pub fn is_between_line(a: Point, b: Point, pt: Point) -> bool {
    if !is_colinear(a, b, pt) {
        return false;
    }
    if a.x != b.x {
        (a.x <= pt.x && pt.x <= b.x) || (a.x >= pt.x && pt.x >= b.x)
    } else {
        (a.y <= pt.y && pt.y <= b.y) || (a.y >= pt.y && pt.y >= b.y)
    }
}

/// Check if `pt` lies on segment `ab` within the point tolerance.
pub fn is_between_line2(a: Point, b: Point, pt: Point, tol: &Tolerance) -> bool {
    if !is_colinear2(a, b, pt, tol) {
        return false;
    }
    let e = tol.point;
    if a.x != b.x {
        (a.x <= pt.x + e && pt.x <= b.x + e) || (a.x >= pt.x - e && pt.x >= b.x - e)
    } else {
        (a.y <= pt.y + e && pt.y <= b.y + e) || (a.y >= pt.y - e && pt.y >= b.y - e)
    }
}

/// Check if the projection of `pt` onto `ab` falls between `a` and `b`.
pub fn is_project_between_line(a: Point, b: Point, pt: Point) -> bool {
    let proj = (pt - a).project_scale_to_vector(b - a);
    (0.0..=1.0).contains(&proj)
}

/// Span test of a point already on the beeline through `a` and `b`.
///
/// Compares along x unless the line is vertical. Returns whether `pt` is
/// between the endpoints, and whichever endpoint is nearer to it.
pub fn is_between_line3(a: Point, b: Point, pt: Point) -> (bool, Point) {
    if a.x != b.x {
        let between = (a.x <= pt.x && pt.x <= b.x) || (a.x >= pt.x && pt.x >= b.x);
        let near = if (pt.x - a.x).abs() < (pt.x - b.x).abs() { a } else { b };
        (between, near)
    } else {
        let between = (a.y <= pt.y && pt.y <= b.y) || (a.y >= pt.y && pt.y >= b.y);
        let near = if (pt.y - a.y).abs() < (pt.y - b.y).abs() { a } else { b };
        (between, near)
    }
}

/// Signed distance measure from `pt` to the beeline `a→b` (cross product).
pub fn pt_to_beeline(a: Point, b: Point, pt: Point) -> f64 {
    (b - a).cross(pt - a)
}

/// Distance from `pt` to the beeline through `a` and `b`, with the perpendicular foot.
pub fn pt_to_beeline2(a: Point, b: Point, pt: Point) -> (f64, Point) {
    if a == b {
        (a.distance(pt), a)
    } else if approx_eq(a.x, b.x) {
        ((a.x - pt.x).abs(), Point::new(a.x, pt.y))
    } else if approx_eq(a.y, b.y) {
        ((a.y - pt.y).abs(), Point::new(pt.x, a.y))
    } else {
        let t1 = (b.y - a.y) / (b.x - a.x);
        let t2 = -1.0 / t1;
        let x = (pt.y - a.y + a.x * t1 - pt.x * t2) / (t1 - t2);
        let foot = Point::new(x, a.y + (x - a.x) * t1);
        (pt.distance(foot), foot)
    }
}

/// Distance from `pt` to segment `ab`, with the nearest point on the segment.
pub fn pt_to_line(a: Point, b: Point, pt: Point) -> (f64, Point) {
    let (dist, foot) = pt_to_beeline2(a, b, pt);
    let (between, near) = is_between_line3(a, b, foot);
    if between {
        (dist, foot)
    } else {
        (pt.distance(near), near)
    }
}

/// Denominator of the crossing system, or `None` when the directions are
/// parallel or too close to parallel for `tol.vector`.
fn crossing_denominator(a: Point, b: Point, c: Point, d: Point, tol: &Tolerance) -> Option<f64> {
    let denom = (c.x - d.x) * (b.y - a.y) - (c.y - d.y) * (b.x - a.x);
    if is_zero(denom) {
        return None;
    }
    let cosnum = (b.x - a.x) * (d.x - c.x) + (b.y - a.y) * (d.y - c.y);
    if !is_zero(cosnum) && (denom / cosnum).abs() < tol.vector {
        return None;
    }
    Some(denom)
}

fn cross_u(a: Point, c: Point, d: Point, denom: f64) -> f64 {
    ((c.x - a.x) * (d.y - c.y) - (c.y - a.y) * (d.x - c.x)) / denom
}

fn cross_v(a: Point, b: Point, c: Point, denom: f64) -> f64 {
    ((c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)) / denom
}

/// Parameter within the bounded part, endpoints included.
fn in_unit_interval(t: f64) -> bool {
    (-ZERO_EPSILON..=1.0 + ZERO_EPSILON).contains(&t)
}

/// Intersection of two beelines `ab` and `cd`.
pub fn cross2_beeline(a: Point, b: Point, c: Point, d: Point, tol: &Tolerance) -> Option<LineCross> {
    let denom = crossing_denominator(a, b, c, d, tol)?;
    let u = cross_u(a, c, d, denom);
    let v = cross_v(a, b, c, denom);
    Some(LineCross {
        point: super::vector::lerp(a, b, u),
        u,
        v,
    })
}

/// Intersection of two segments `ab` and `cd`, including touching endpoints.
pub fn cross2_line(a: Point, b: Point, c: Point, d: Point, tol: &Tolerance) -> Option<LineCross> {
    if a.x.min(b.x) - c.x.max(d.x) > ZERO_EPSILON
        || c.x.min(d.x) - a.x.max(b.x) > ZERO_EPSILON
        || a.y.min(b.y) - c.y.max(d.y) > ZERO_EPSILON
        || c.y.min(d.y) - a.y.max(b.y) > ZERO_EPSILON
    {
        return None;
    }
    let denom = crossing_denominator(a, b, c, d, tol)?;
    let u = cross_u(a, c, d, denom);
    if !in_unit_interval(u) {
        return None;
    }
    let v = cross_v(a, b, c, denom);
    if !in_unit_interval(v) {
        return None;
    }
    Some(LineCross {
        point: super::vector::lerp(a, b, u),
        u,
        v,
    })
}

/// Intersection of segment `ab` with beeline `cd`.
pub fn cross_line_beeline(a: Point, b: Point, c: Point, d: Point, tol: &Tolerance) -> Option<LineCross> {
    let denom = crossing_denominator(a, b, c, d, tol)?;
    let u = cross_u(a, c, d, denom);
    if !in_unit_interval(u) {
        return None;
    }
    Some(LineCross {
        point: super::vector::lerp(a, b, u),
        u,
        v: cross_v(a, b, c, denom),
    })
}

/// Intersection of two lines in implicit form `a·x + b·y = c`.
#[allow(clippy::too_many_arguments)]
pub fn cross_line_abc(a1: f64, b1: f64, c1: f64, a2: f64, b2: f64, c2: f64, tol: &Tolerance) -> Option<Point> {
    let sinnum = a1 * b2 - a2 * b1;
    if is_zero(sinnum) {
        return None;
    }
    let cosnum = a1 * a2 + b1 * b2;
    if !is_zero(cosnum) && (sinnum / cosnum).abs() < tol.vector {
        return None;
    }
    Some(Point::new((c1 * b2 - c2 * b1) / sinnum, (a1 * c2 - a2 * c1) / sinnum))
}
