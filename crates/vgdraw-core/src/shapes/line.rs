//! Line shape: segment, ray or infinite line through two points.

use super::{HandleType, HitResult, Shape, ShapeBase, ShapeFlags, load_base, save_base};
use crate::geom::{Tolerance, VectorExt, box_contains, boxes_overlap, clip_line, pt_to_beeline2, pt_to_line};
use crate::storage::{Storage, StorageResult};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Storage key of the line mode.
pub const KEY_LINE_MODE: &str = "mode";

/// How far a line extends beyond its two defining points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineMode {
    /// Bounded by both points.
    #[default]
    Segment,
    /// Starts at the first point and runs through the second to infinity.
    Ray,
    /// Unbounded in both directions.
    Beeline,
}

impl LineMode {
    fn to_int(self) -> i64 {
        match self {
            LineMode::Segment => 0,
            LineMode::Ray => 1,
            LineMode::Beeline => 2,
        }
    }

    fn from_int(value: i64) -> Self {
        match value {
            1 => LineMode::Ray,
            2 => LineMode::Beeline,
            _ => LineMode::Segment,
        }
    }
}

/// A straight line defined by a start and an end point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    base: ShapeBase,
    start: Point,
    end: Point,
    mode: LineMode,
}

impl Line {
    pub const TYPE_TAG: &'static str = "line";

    /// Create a line segment.
    pub fn new(start: Point, end: Point) -> Self {
        Self::with_mode(start, end, LineMode::Segment)
    }

    /// Create a line with the given extension mode.
    pub fn with_mode(start: Point, end: Point, mode: LineMode) -> Self {
        let mut line = Self {
            start,
            end,
            mode,
            ..Self::default()
        };
        line.update();
        line
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn mode(&self) -> LineMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LineMode) {
        if self.mode != mode {
            self.mode = mode;
            self.base.after_changed();
        }
    }

    /// Get the length of the defining segment.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Get the midpoint of the defining segment.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// The defining points pushed out far enough to cover `rect`.
    fn extended_over(&self, rect: Rect) -> (Point, Point) {
        let dir = self.end - self.start;
        let len = dir.hypot();
        if self.mode == LineMode::Segment || len <= 0.0 {
            return (self.start, self.end);
        }
        let rect = rect.abs();
        let reach = self.start.distance(rect.center()) + rect.size().to_vec2().hypot() + len;
        let unit = dir / len;
        let far = self.start + unit * reach;
        match self.mode {
            LineMode::Beeline => (self.start - unit * reach, far),
            _ => (self.start, far),
        }
    }
}

impl Shape for Line {
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
        2
    }

    fn point(&self, index: usize) -> Point {
        match index {
            0 => self.start,
            1 => self.end,
            _ => panic!("line point index {index} out of range"),
        }
    }

    fn set_point(&mut self, index: usize, pt: Point) {
        match index {
            0 => self.start = pt,
            1 => self.end = pt,
            _ => panic!("line point index {index} out of range"),
        }
    }

    fn clear(&mut self) {
        self.start = Point::ZERO;
        self.end = Point::ZERO;
        self.update();
    }

    fn hit_test(&self, pt: Point, _tol: &Tolerance) -> HitResult {
        let (distance, nearest) = match self.mode {
            LineMode::Segment => pt_to_line(self.start, self.end, pt),
            LineMode::Beeline => pt_to_beeline2(self.start, self.end, pt),
            LineMode::Ray => {
                let t = (pt - self.start).project_scale_to_vector(self.end - self.start);
                if t < 0.0 {
                    (pt.distance(self.start), self.start)
                } else {
                    pt_to_beeline2(self.start, self.end, pt)
                }
            }
        };
        HitResult {
            nearest,
            segment: Some(0),
            inside: false,
            distance,
        }
    }

    fn hit_test_box(&self, rect: Rect) -> bool {
        if self.mode == LineMode::Segment && !boxes_overlap(self.extent(), rect) {
            return false;
        }
        let (a, b) = self.extended_over(rect);
        if a == b {
            return box_contains(rect, a);
        }
        clip_line(a, b, rect).is_some()
    }

    fn handle_count(&self) -> usize {
        3
    }

    fn handle_point(&self, index: usize) -> Point {
        match index {
            2 => self.midpoint(),
            _ => self.point(index),
        }
    }

    fn handle_type(&self, index: usize) -> HandleType {
        match index {
            2 => HandleType::Midpoint,
            _ => HandleType::Vertex,
        }
    }

    fn set_handle_point(&mut self, index: usize, pt: Point, _tol: f64) -> bool {
        if self.is_handle_fixed(index) {
            return false;
        }
        if index == 2 {
            let delta = pt - self.midpoint();
            return self.offset(delta, None);
        }
        let target = if self.flag(ShapeFlags::FIXED_LENGTH) {
            let other = self.point(1 - index);
            let dir = pt - other;
            if dir.hypot() <= 0.0 {
                return false;
            }
            other + dir.normalize() * self.length()
        } else {
            pt
        };
        self.set_point(index, target);
        self.update();
        true
    }

    fn offset(&mut self, vec: Vec2, _segment: Option<usize>) -> bool {
        self.start += vec;
        self.end += vec;
        self.update();
        true
    }

    fn save(&self, storage: &mut dyn Storage) -> StorageResult<()> {
        save_base(self, storage)?;
        storage.write_int(KEY_LINE_MODE, self.mode.to_int());
        Ok(())
    }

    fn load(&mut self, storage: &dyn Storage) -> StorageResult<()> {
        load_base(self, storage)?;
        self.mode = LineMode::from_int(storage.read_int(KEY_LINE_MODE, 0));
        Ok(())
    }
}
