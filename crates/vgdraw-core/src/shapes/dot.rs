//! Dot shape.

use super::{HitResult, Shape, ShapeBase, load_base, save_base};
use crate::geom::Tolerance;
use crate::storage::{Storage, StorageResult};
use kurbo::{Point, Rect};
use std::any::Any;

/// Storage key of the point type.
pub const KEY_POINT_TYPE: &str = "pttype";

/// A single marker point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dot {
    base: ShapeBase,
    point: Point,
    /// Marker type, interpreted by the renderer.
    pub point_type: i32,
}

impl Dot {
    pub const TYPE_TAG: &'static str = "dot";

    /// Create a dot at `point`.
    pub fn new(point: Point) -> Self {
        let mut dot = Self {
            point,
            ..Self::default()
        };
        dot.update();
        dot
    }

    pub fn position(&self) -> Point {
        self.point
    }

    /// Read the marker type stored under `"pttype"`; out-of-range values give `default`.
    pub fn read_point_type(storage: &dyn Storage, default: i32) -> i32 {
        i32::try_from(storage.read_int(KEY_POINT_TYPE, i64::from(default))).unwrap_or(default)
    }
}

impl Shape for Dot {
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
        1
    }

    fn point(&self, _index: usize) -> Point {
        self.point
    }

    fn set_point(&mut self, _index: usize, pt: Point) {
        self.point = pt;
    }

    fn clear(&mut self) {
        self.point = Point::ZERO;
        self.update();
    }

    fn hit_test(&self, pt: Point, _tol: &Tolerance) -> HitResult {
        HitResult {
            nearest: self.point,
            segment: Some(0),
            inside: false,
            distance: self.point.distance(pt),
        }
    }

    fn hit_test_box(&self, rect: Rect) -> bool {
        crate::geom::box_contains(rect, self.point)
    }

    fn save(&self, storage: &mut dyn Storage) -> StorageResult<()> {
        save_base(self, storage)?;
        storage.write_int(KEY_POINT_TYPE, i64::from(self.point_type));
        Ok(())
    }

    fn load(&mut self, storage: &dyn Storage) -> StorageResult<()> {
        load_base(self, storage)?;
        self.point_type = Self::read_point_type(storage, 0);
        Ok(())
    }
}
