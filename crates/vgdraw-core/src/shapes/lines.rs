//! Polyline and polygon shape.

use super::{Shape, ShapeBase, ShapeFlags};
use kurbo::{Point, Vec2};
use std::any::Any;

/// An open polyline, or a polygon when the closed flag is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lines {
    base: ShapeBase,
    points: Vec<Point>,
}

impl Lines {
    pub const TYPE_TAG: &'static str = "lines";

    /// Create a polyline (or polygon if `closed`) from points.
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        let mut lines = Self {
            base: ShapeBase::default(),
            points,
        };
        lines.base.flags.set(ShapeFlags::CLOSED, closed);
        lines.update();
        lines
    }

    /// Create an empty polygon.
    pub fn polygon() -> Self {
        Self::new(Vec::new(), true)
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.set_flag(ShapeFlags::CLOSED, closed);
    }

    /// Append a vertex.
    pub fn add_point(&mut self, pt: Point) {
        self.points.push(pt);
        self.update();
    }

    /// Insert a vertex before `index`.
    pub fn insert_point(&mut self, index: usize, pt: Point) {
        self.points.insert(index, pt);
        self.update();
    }

    /// Remove a vertex; refuses to go below two points.
    pub fn remove_point(&mut self, index: usize) -> bool {
        if self.points.len() <= 2 || index >= self.points.len() {
            return false;
        }
        self.points.remove(index);
        self.update();
        true
    }

    /// Number of edges, including the closing edge of a polygon.
    pub fn edge_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            2 => 1,
            n if self.is_closed() => n,
            n => n - 1,
        }
    }
}

impl Shape for Lines {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn clone_box(&self) -> Box<dyn Shape> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    fn set_point(&mut self, index: usize, pt: Point) {
        self.points[index] = pt;
    }

    fn resize(&mut self, count: usize) -> bool {
        let fill = self.points.last().copied().unwrap_or(Point::ZERO);
        self.points.resize(count, fill);
        true
    }

    fn points(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn clear(&mut self) {
        self.points.clear();
        self.update();
    }

    /// Moves only the edge `segment` when given, otherwise the whole shape.
    fn offset(&mut self, vec: Vec2, segment: Option<usize>) -> bool {
        match segment {
            Some(seg) if seg < self.edge_count() => {
                let next = (seg + 1) % self.points.len();
                self.points[seg] += vec;
                self.points[next] += vec;
            }
            Some(_) => return false,
            None => self.points.iter_mut().for_each(|p| *p += vec),
        }
        self.update();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Tolerance;
    use crate::shapes::load_base;
    use crate::storage::MemoryStorage;
    use kurbo::Rect;

    fn square() -> Lines {
        Lines::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ],
            true,
        )
    }

    #[test]
    fn test_polygon_edges_and_extent() {
        let poly = square();
        assert!(poly.is_closed());
        assert_eq!(poly.edge_count(), 4);
        assert_eq!(poly.extent(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_polygon_hit_test_inside_and_closing_edge() {
        let poly = square();
        let res = poly.hit_test(Point::new(-1.0, 5.0), &Tolerance::with_point(0.01));
        assert_eq!(res.segment, Some(3));
        assert!((res.distance - 1.0).abs() < 1e-12);
        assert!(!res.inside);
        assert!(poly.hit_test(Point::new(5.0, 5.0), &Tolerance::with_point(0.01)).inside);
    }

    #[test]
    fn test_polyline_has_no_closing_edge() {
        let mut open = square();
        open.set_closed(false);
        assert_eq!(open.edge_count(), 3);
        let res = open.hit_test(Point::new(-1.0, 5.0), &Tolerance::with_point(0.01));
        assert!((res.distance - 26f64.sqrt()).abs() < 1e-12);
        assert_eq!(res.segment, Some(0));
        assert!(!res.inside);
    }

    #[test]
    fn test_offset_segment_moves_only_its_endpoints() {
        let mut poly = square();
        assert!(poly.offset(Vec2::new(0.0, -5.0), Some(3)));
        assert_eq!(poly.point(3), Point::new(0.0, 5.0));
        assert_eq!(poly.point(0), Point::new(0.0, -5.0));
        assert_eq!(poly.point(1), Point::new(10.0, 0.0));
        assert!(!poly.offset(Vec2::new(1.0, 0.0), Some(9)));
    }

    #[test]
    fn test_add_and_remove_points() {
        let mut lines = Lines::default();
        lines.add_point(Point::new(0.0, 0.0));
        lines.add_point(Point::new(2.0, 0.0));
        lines.insert_point(1, Point::new(1.0, 1.0));
        assert_eq!(lines.point_count(), 3);
        assert!(lines.remove_point(1));
        assert!(!lines.remove_point(0));
        assert_eq!(lines.points(), vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]);
    }

    #[test]
    fn test_load_restores_count_and_closed_flag() {
        let poly = square();
        let mut storage = MemoryStorage::new();
        poly.save(&mut storage).unwrap();
        let mut restored = Lines::default();
        load_base(&mut restored, &storage).unwrap();
        assert_eq!(restored.points(), poly.points());
        assert!(restored.is_closed());
    }
}
