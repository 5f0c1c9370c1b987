//! Shape container that receives committed shapes.

use crate::geom::Tolerance;
use crate::shapes::{HitResult, Shape, ShapeFlags, ShapeId};
use kurbo::{Point, Rect};
use std::collections::HashMap;
use uuid::Uuid;

/// Destination of committed shapes and source of selection hits.
///
/// Hosts hand their container to commands through `CommandView`;
/// [`ShapeList`] is the in-memory implementation.
pub trait ShapeContainer {
    /// Store a copy of `shape` and return its new id.
    fn add_shape(&mut self, shape: &dyn Shape) -> ShapeId;

    /// Find the shape nearest to the center of `limits`.
    ///
    /// Only shapes touching `limits` are considered; a shape is hit when its
    /// distance is within `tol.point` or the center lies inside it.
    fn hit_test(&self, limits: Rect, tol: &Tolerance) -> Option<(ShapeId, HitResult)>;

    /// Get a shape by id.
    fn shape(&self, id: ShapeId) -> Option<&dyn Shape>;

    /// Number of stored shapes.
    fn shape_count(&self) -> usize;
}

/// Shapes keyed by id, with a back-to-front drawing order.
#[derive(Debug, Clone, Default)]
pub struct ShapeList {
    shapes: HashMap<ShapeId, Box<dyn Shape>>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
}

impl ShapeList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a shape and return its new id.
    pub fn push(&mut self, shape: Box<dyn Shape>) -> ShapeId {
        let id = Uuid::new_v4();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Remove a shape.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Box<dyn Shape>> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    /// Clear all shapes.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
    }

    /// Get a mutable reference to a shape by id.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut (dyn Shape + 'static)> {
        self.shapes.get_mut(&id).map(|s| s.as_mut())
    }

    /// Shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = (ShapeId, &dyn Shape)> {
        self.z_order
            .iter()
            .filter_map(|id| self.shapes.get(id).map(|s| (*id, s.as_ref())))
    }

    /// Ids in z-order (back to front).
    pub fn ids(&self) -> &[ShapeId] {
        &self.z_order
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Get the bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .values()
            .map(|s| s.extent())
            .reduce(|a, b| a.union(b))
    }

}

impl ShapeContainer for ShapeList {
    fn add_shape(&mut self, shape: &dyn Shape) -> ShapeId {
        self.push(shape.clone_box())
    }

    fn hit_test(&self, limits: Rect, tol: &Tolerance) -> Option<(ShapeId, HitResult)> {
        let center: Point = limits.abs().center();
        let mut best: Option<(ShapeId, HitResult)> = None;
        // Front to back, so the topmost shape wins a tie.
        for &id in self.z_order.iter().rev() {
            let Some(shape) = self.shapes.get(&id) else {
                continue;
            };
            if shape.flag(ShapeFlags::HIDDEN) || !shape.hit_test_box(limits) {
                continue;
            }
            let res = shape.hit_test(center, tol);
            if !(res.is_hit(tol.point) || res.inside) {
                continue;
            }
            if best.as_ref().is_none_or(|(_, b)| res.distance < b.distance) {
                best = Some((id, res));
            }
        }
        best
    }

    fn shape(&self, id: ShapeId) -> Option<&dyn Shape> {
        self.shapes.get(&id).map(|s| s.as_ref())
    }

    fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::box_around;
    use crate::shapes::{Dot, Line, Lines};

    #[test]
    fn test_add_shape_copies() {
        let mut list = ShapeList::new();
        let line = Line::new(Point::new(0.0, 0.0), Point::new(5.0, 0.0));
        let id = list.add_shape(&line);
        assert_eq!(list.shape_count(), 1);
        assert_eq!(list.shape(id).unwrap().points(), line.points());
        assert_eq!(list.ids(), &[id]);
    }

    #[test]
    fn test_hit_test_nearest_shape() {
        let mut list = ShapeList::new();
        let far = list.add_shape(&Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
        let near = list.add_shape(&Line::new(Point::new(0.0, 0.6), Point::new(10.0, 0.6)));
        let (id, res) = list.hit_test(box_around(Point::new(5.0, 0.5), 1.0), &Tolerance::with_point(0.5)).unwrap();
        assert_eq!(id, near);
        assert!((res.distance - 0.1).abs() < 1e-9);
        assert_ne!(id, far);
    }

    #[test]
    fn test_hit_test_prefers_topmost_on_tie() {
        let mut list = ShapeList::new();
        list.add_shape(&Dot::new(Point::new(1.0, 1.0)));
        let top = list.add_shape(&Dot::new(Point::new(1.0, 1.0)));
        let (id, _) = list.hit_test(box_around(Point::new(1.0, 1.0), 1.0), &Tolerance::with_point(0.5)).unwrap();
        assert_eq!(id, top);
    }

    #[test]
    fn test_hit_test_inside_polygon_and_hidden() {
        let mut list = ShapeList::new();
        let mut poly = Lines::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0), Point::new(0.0, 10.0)],
            true,
        );
        let id = list.add_shape(&poly);
        let limits = box_around(Point::new(5.0, 5.0), 1.0);
        let (hit, res) = list.hit_test(limits, &Tolerance::with_point(0.5)).unwrap();
        assert_eq!(hit, id);
        assert!(res.inside);

        list.clear();
        poly.set_flag(ShapeFlags::HIDDEN, true);
        list.add_shape(&poly);
        assert!(list.hit_test(limits, &Tolerance::with_point(0.5)).is_none());
    }

    #[test]
    fn test_hit_test_miss() {
        let mut list = ShapeList::new();
        list.add_shape(&Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
        assert!(list.hit_test(box_around(Point::new(5.0, 4.0), 1.0), &Tolerance::with_point(0.5)).is_none());
    }

    #[test]
    fn test_remove_and_bounds() {
        let mut list = ShapeList::new();
        let a = list.add_shape(&Dot::new(Point::new(-1.0, -1.0)));
        list.add_shape(&Line::new(Point::new(0.0, 0.0), Point::new(4.0, 2.0)));
        assert_eq!(list.bounds(), Some(Rect::new(-1.0, -1.0, 4.0, 2.0)));
        assert!(list.remove_shape(a).is_some());
        assert_eq!(list.len(), 1);
        assert_eq!(list.ids().len(), 1);
    }
}
