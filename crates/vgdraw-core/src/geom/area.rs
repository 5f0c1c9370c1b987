//! Point-in-polygon classification and convexity.

use super::lnrel::{is_between_line3, pt_to_beeline2};
use super::tol::{Tolerance, approx_eq};
use kurbo::Point;

/// Where a point lies relative to a polygon or polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaPosition {
    /// Outside the area.
    Outside,
    /// Strictly inside the area.
    Inside,
    /// On the edge starting at the given vertex index.
    OnEdge(usize),
    /// On the vertex with the given index.
    AtVertex(usize),
}

impl AreaPosition {
    /// Check if the point is inside or on the boundary.
    pub fn is_inside_or_on(self) -> bool {
        !matches!(self, AreaPosition::Outside)
    }
}

/// Winding direction of a convex polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
}

/// Convexity of a vertex sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convexity {
    /// Fewer than three vertices, or all vertices colinear.
    Degenerate,
    /// Every turn has the same direction.
    Convex(Orientation),
    /// At least one turn disagrees with the others.
    Concave,
}

/// Toggle `inside` if the upward ray from `pt` crosses edge `p1→p2`.
/// `p0` is the vertex before `p1`. Returns false if `pt.x` is outside the edge's x-span.
fn check_edge(inside: &mut bool, pt: Point, p1: Point, p2: Point, p0: Point) -> bool {
    let in_span = (p2.x > p1.x && pt.x >= p1.x && pt.x < p2.x) || (p1.x > p2.x && pt.x <= p1.x && pt.x > p2.x);
    if !in_span {
        return false;
    }

    if pt.y > p1.y + (pt.x - p1.x) * (p2.y - p1.y) / (p2.x - p1.x) {
        // A crossing through vertex p1 counts once, and only when the
        // neighbours lie on opposite sides of it.
        if approx_eq(pt.x, p1.x) && ((p0.x > pt.x && p2.x > pt.x) || (p0.x < pt.x && p2.x < pt.x)) {
            return false;
        }
        *inside = !*inside;
    }
    true
}

/// Classify `pt` against the area bounded by `vertices`.
///
/// Vertices are checked first, then edges (including the closing edge when
/// `closed`), then crossing parity decides inside or outside.
pub fn pt_in_area(pt: Point, vertices: &[Point], tol: &Tolerance, closed: bool) -> AreaPosition {
    let count = vertices.len();
    if count == 0 {
        return AreaPosition::Outside;
    }

    let mut nearest: Option<(usize, f64)> = None;
    for (i, v) in vertices.iter().enumerate() {
        let d = pt.distance(*v);
        if d <= tol.point && nearest.is_none_or(|(_, best)| d < best) {
            nearest = Some((i, d));
        }
    }
    if let Some((i, _)) = nearest {
        return AreaPosition::AtVertex(i);
    }

    let edge_count = if closed { count } else { count - 1 };
    let mut inside = false;
    let mut on_edge: Option<(usize, f64)> = None;
    for i in 0..edge_count {
        let p1 = vertices[i];
        let p2 = vertices[(i + 1) % count];
        let (d, foot) = pt_to_beeline2(p1, p2, pt);
        let close = d <= tol.point && on_edge.is_none_or(|(_, best)| d < best);
        if close && is_between_line3(p1, p2, foot).0 {
            on_edge = Some((i, d));
        } else {
            let p0 = vertices[(i + count - 1) % count];
            check_edge(&mut inside, pt, p1, p2, p0);
        }
    }
    if let Some((i, _)) = on_edge {
        return AreaPosition::OnEdge(i);
    }

    if inside {
        AreaPosition::Inside
    } else {
        AreaPosition::Outside
    }
}

/// Turn direction at `b` for the path `a→b→c`; positive for a left turn.
fn turn(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - b)
}

/// Determine whether the closed polygon through `vertices` is convex.
///
/// Colinear triples do not take part in the comparison.
pub fn convexity(vertices: &[Point]) -> Convexity {
    let count = vertices.len();
    if count < 3 {
        return Convexity::Degenerate;
    }

    let mut reference: Option<bool> = None;
    for i in 0..count {
        let t = turn(vertices[(i + count - 1) % count], vertices[i], vertices[(i + 1) % count]);
        if t == 0.0 {
            continue;
        }
        let left = t > 0.0;
        match reference {
            None => reference = Some(left),
            Some(r) if r != left => return Convexity::Concave,
            Some(_) => {}
        }
    }

    match reference {
        None => Convexity::Degenerate,
        Some(true) => Convexity::Convex(Orientation::CounterClockwise),
        Some(false) => Convexity::Convex(Orientation::Clockwise),
    }
}

/// Check if the closed polygon through `vertices` is convex.
/// Degenerate input counts as convex.
pub fn is_convex(vertices: &[Point]) -> bool {
    !matches!(convexity(vertices), Convexity::Concave)
}
