//! Shape contract and the built-in shape kinds.

mod dot;
mod handle;
mod line;
mod lines;
mod rect;

pub use dot::{Dot, KEY_POINT_TYPE};
pub use handle::{DragState, Handle, HandleType, handles};
pub use line::{KEY_LINE_MODE, Line, LineMode};
pub use lines::Lines;
pub use rect::RectShape;

use crate::geom::{Tolerance, box_contains, boxes_overlap, clip_line, extent_of, pt_in_area, pt_to_line};
use crate::storage::{Storage, StorageError, StorageResult};
use crate::style::ShapeStyle;
use kurbo::{Affine, Point, Rect, Vec2};
use std::any::Any;
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a committed shape.
pub type ShapeId = Uuid;

bitflags::bitflags! {
    /// Feature flags of a shape.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShapeFlags: u16 {
        const SQUARE          = 1 << 0;
        const CLOSED          = 1 << 1;
        const FIXED_LENGTH    = 1 << 2;
        /// Only rotation and translation are allowed.
        const FIXED_SIZE      = 1 << 3;
        const ROTATE_DISABLED = 1 << 4;
        const LOCKED          = 1 << 5;
        const NO_SNAP         = 1 << 6;
        /// No context actions.
        const NO_ACTION       = 1 << 7;
        const NO_CLONE        = 1 << 8;
        const HIDDEN          = 1 << 9;
    }
}

/// Result of a point hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Nearest point on the shape.
    pub nearest: Point,
    /// Part of the shape holding the nearest point; meaning depends on the kind.
    pub segment: Option<usize>,
    /// Whether the point lies inside a closed shape.
    pub inside: bool,
    /// Distance to the nearest point; `f64::MAX` when nothing usable was found.
    pub distance: f64,
}

impl Default for HitResult {
    fn default() -> Self {
        Self {
            nearest: Point::ZERO,
            segment: None,
            inside: false,
            distance: f64::MAX,
        }
    }
}

impl HitResult {
    /// Check if the hit is within `tolerance`.
    pub fn is_hit(&self, tolerance: f64) -> bool {
        self.distance <= tolerance
    }
}

/// State shared by every shape kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeBase {
    extent: Rect,
    flags: ShapeFlags,
    change_count: u64,
    style: ShapeStyle,
}

impl ShapeBase {
    /// Create a base with the given flags.
    pub fn with_flags(flags: ShapeFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// Store a new extent and count the content change.
    pub fn set_extent(&mut self, extent: Rect) {
        self.extent = extent;
        self.after_changed();
    }

    /// Count a content change.
    pub fn after_changed(&mut self) {
        self.change_count += 1;
    }
}

/// Contract of every drawable primitive.
///
/// Point edits through [`Shape::set_point`] do not refresh the cached
/// extent; batch them and call [`Shape::update`] once. Point and handle
/// indices must be in range.
pub trait Shape: fmt::Debug {
    /// Type tag used by factories and storage.
    fn type_tag(&self) -> &'static str;

    fn base(&self) -> &ShapeBase;
    fn base_mut(&mut self) -> &mut ShapeBase;

    /// Clone this shape into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Shape>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn point_count(&self) -> usize;
    fn point(&self, index: usize) -> Point;
    fn set_point(&mut self, index: usize, pt: Point);

    /// Change the number of points. Fixed-count kinds only accept their own count.
    /// New points repeat the last existing point (or the origin).
    fn resize(&mut self, count: usize) -> bool {
        count == self.point_count()
    }

    /// Reset the points and refresh the extent.
    fn clear(&mut self);

    /// Copy of all points in order.
    fn points(&self) -> Vec<Point> {
        (0..self.point_count()).map(|i| self.point(i)).collect()
    }

    /// Recompute the cached extent from the points.
    fn update(&mut self) {
        let extent = extent_of(&self.points());
        self.base_mut().set_extent(extent);
    }

    /// Cached bounding box.
    fn extent(&self) -> Rect {
        self.base().extent
    }

    /// Apply an affine transform to every point.
    fn transform(&mut self, affine: Affine) {
        for i in 0..self.point_count() {
            let pt = self.point(i);
            self.set_point(i, affine * pt);
        }
        self.update();
    }

    fn is_closed(&self) -> bool {
        self.flag(ShapeFlags::CLOSED)
    }

    /// Distance from `pt` to the outline; `tol` decides the inside test of closed shapes.
    fn hit_test(&self, pt: Point, tol: &Tolerance) -> HitResult {
        hit_test_polyline(&self.points(), self.is_closed(), pt, tol)
    }

    /// Check if the shape touches `rect`.
    fn hit_test_box(&self, rect: Rect) -> bool {
        boxes_overlap(self.extent(), rect) && polyline_touches_box(&self.points(), self.is_closed(), rect)
    }

    fn handle_count(&self) -> usize {
        self.point_count()
    }

    fn handle_point(&self, index: usize) -> Point {
        self.point(index)
    }

    fn handle_type(&self, _index: usize) -> HandleType {
        HandleType::Vertex
    }

    fn is_handle_fixed(&self, _index: usize) -> bool {
        self.flag(ShapeFlags::LOCKED)
    }

    /// Move handle `index` to `pt`. `tol` is the distance under which points merge.
    fn set_handle_point(&mut self, index: usize, pt: Point, _tol: f64) -> bool {
        self.set_point(index, pt);
        self.update();
        true
    }

    /// Move handle `index` during a multi-event drag, carrying the chosen sub-mode.
    fn set_handle_point2(&mut self, index: usize, pt: Point, tol: f64, state: DragState) -> (bool, DragState) {
        let state = match state {
            DragState::Idle => DragState::Vertex(index),
            other => other,
        };
        (self.set_handle_point(index, pt, tol), state)
    }

    /// Move the shape by `vec`. `segment` comes from [`Shape::hit_test`];
    /// kinds that support it move only that part.
    fn offset(&mut self, vec: Vec2, _segment: Option<usize>) -> bool {
        self.transform(Affine::translate(vec));
        true
    }

    fn flags(&self) -> ShapeFlags {
        self.base().flags
    }

    fn flag(&self, flag: ShapeFlags) -> bool {
        self.base().flags.contains(flag)
    }

    fn set_flag(&mut self, flag: ShapeFlags, on: bool) {
        let base = self.base_mut();
        base.flags.set(flag, on);
        base.after_changed();
    }

    fn style(&self) -> &ShapeStyle {
        &self.base().style
    }

    fn set_style(&mut self, style: ShapeStyle) {
        self.base_mut().style = style;
    }

    /// Number of content changes since creation; never persisted.
    fn change_count(&self) -> u64 {
        self.base().change_count
    }

    fn reset_change_count(&mut self, count: u64) {
        self.base_mut().change_count = count;
    }

    /// Write type tag, flags, points and style.
    fn save(&self, storage: &mut dyn Storage) -> StorageResult<()> {
        save_base(self, storage)
    }

    /// Restore flags and points written by [`Shape::save`].
    fn load(&mut self, storage: &dyn Storage) -> StorageResult<()> {
        load_base(self, storage)
    }
}

impl Clone for Box<dyn Shape> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Storage key of the type tag.
pub const KEY_TYPE: &str = "type";
/// Storage key of the flag bits.
pub const KEY_FLAGS: &str = "flags";
/// Storage key of the point list.
pub const KEY_POINTS: &str = "points";
/// Storage key of the JSON-encoded style.
pub const KEY_STYLE: &str = "style";

/// Write the fields shared by every kind.
pub fn save_base<S: Shape + ?Sized>(shape: &S, storage: &mut dyn Storage) -> StorageResult<()> {
    storage.write_string(KEY_TYPE, shape.type_tag());
    storage.write_int(KEY_FLAGS, i64::from(shape.flags().bits()));
    storage.write_points(KEY_POINTS, &shape.points());
    storage.write_string(KEY_STYLE, &serde_json::to_string(shape.style())?);
    Ok(())
}

/// Read the fields written by [`save_base`] and refresh the extent.
///
/// Out-of-range flag bits load as no flags; a missing style keeps the current one.
pub fn load_base<S: Shape + ?Sized>(shape: &mut S, storage: &dyn Storage) -> StorageResult<()> {
    let points = storage
        .read_points(KEY_POINTS)
        .ok_or_else(|| StorageError::MissingKey(KEY_POINTS.to_string()))?;
    if !shape.resize(points.len()) {
        return Err(StorageError::InvalidValue {
            key: KEY_POINTS.to_string(),
            reason: format!("{} cannot hold {} points", shape.type_tag(), points.len()),
        });
    }
    for (i, pt) in points.into_iter().enumerate() {
        shape.set_point(i, pt);
    }
    let bits = storage.read_int(KEY_FLAGS, 0);
    let flags = u16::try_from(bits).map(ShapeFlags::from_bits_truncate).unwrap_or_else(|_| {
        log::warn!("Ignoring out-of-range flags {bits} of {} shape", shape.type_tag());
        ShapeFlags::default()
    });
    shape.base_mut().flags = flags;
    if let Some(json) = storage.read_string(KEY_STYLE) {
        shape.set_style(serde_json::from_str(&json)?);
    }
    shape.update();
    Ok(())
}

/// Edges of a point sequence as index pairs, including the closing edge when `closed`.
fn edges(count: usize, closed: bool) -> impl Iterator<Item = (usize, usize)> {
    let edge_count = match count {
        0 | 1 => 0,
        2 => 1,
        n if closed => n,
        n => n - 1,
    };
    (0..edge_count).map(move |i| (i, (i + 1) % count))
}

/// Hit test against consecutive point pairs, keeping the nearest segment.
///
/// Closed sequences with at least three points also report whether `pt`
/// is inside. Fewer than two points give the sentinel result.
pub fn hit_test_polyline(points: &[Point], closed: bool, pt: Point, tol: &Tolerance) -> HitResult {
    let mut res = HitResult::default();
    for (i, j) in edges(points.len(), closed) {
        let (dist, near) = pt_to_line(points[i], points[j], pt);
        if dist < res.distance {
            res.distance = dist;
            res.nearest = near;
            res.segment = Some(i);
        }
    }
    if closed && points.len() > 2 {
        res.inside = pt_in_area(pt, points, tol, true).is_inside_or_on();
    }
    res
}

/// Check if any edge of the sequence enters `rect`.
pub fn polyline_touches_box(points: &[Point], closed: bool, rect: Rect) -> bool {
    if points.len() == 1 {
        return box_contains(rect, points[0]);
    }
    edges(points.len(), closed).any(|(i, j)| clip_line(points[i], points[j], rect).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use peniko::Color;

    #[test]
    fn test_hit_result_sentinel() {
        let res = hit_test_polyline(&[Point::new(1.0, 1.0)], false, Point::ZERO, &Tolerance::default());
        assert_eq!(res.distance, f64::MAX);
        assert!(res.segment.is_none());
        assert!(!res.is_hit(1e9));
    }

    #[test]
    fn test_hit_test_polyline_nearest_segment() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let res = hit_test_polyline(&pts, false, Point::new(11.0, 6.0), &Tolerance::with_point(0.1));
        assert_eq!(res.segment, Some(1));
        assert!((res.distance - 1.0).abs() < 1e-12);
        assert_eq!(res.nearest, Point::new(10.0, 6.0));
        assert!(!res.inside);
    }

    #[test]
    fn test_hit_test_polyline_closed_inside() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let tol = Tolerance::with_point(0.1);
        let res = hit_test_polyline(&pts, true, Point::new(7.0, 2.0), &tol);
        assert!(res.inside);
        let res = hit_test_polyline(&pts, true, Point::new(2.0, 7.0), &tol);
        assert!(!res.inside);
        // The closing edge is the nearest one.
        assert_eq!(res.segment, Some(2));
    }

    #[test]
    fn test_polyline_touches_box() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(polyline_touches_box(&pts, false, Rect::new(4.0, 4.0, 6.0, 6.0)));
        assert!(!polyline_touches_box(&pts, false, Rect::new(6.0, 0.0, 9.0, 3.0)));
    }

    #[test]
    fn test_default_handle_drag_moves_vertex() {
        let mut lines = Lines::new(vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(4.0, 4.0)], false);
        let (moved, state) = lines.set_handle_point2(1, Point::new(5.0, 1.0), 0.0, DragState::Idle);
        assert!(moved);
        assert_eq!(state, DragState::Vertex(1));
        assert_eq!(lines.point(1), Point::new(5.0, 1.0));
        assert_eq!(lines.extent(), Rect::new(0.0, 0.0, 5.0, 4.0));

        // The state chosen on the first event is carried along.
        let (_, state) = lines.set_handle_point2(1, Point::new(6.0, 1.0), 0.0, state);
        assert_eq!(state, DragState::Vertex(1));
        assert_eq!(lines.point(1), Point::new(6.0, 1.0));
    }

    #[test]
    fn test_style_persists_through_storage() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(3.0, 0.0));
        let fill = Color::from_rgba8(10, 20, 30, 255);
        line.set_style(ShapeStyle {
            stroke_width: 2.5,
            fill_color: Some(fill.into()),
            ..ShapeStyle::default()
        });
        let mut storage = MemoryStorage::new();
        line.save(&mut storage).unwrap();

        let mut restored = Line::default();
        restored.load(&storage).unwrap();
        assert_eq!(restored.style(), line.style());
        assert_eq!(restored.style().fill().map(|c| c.to_rgba8()), Some(fill.to_rgba8()));
    }

    #[test]
    fn test_load_without_style_keeps_current() {
        let mut storage = MemoryStorage::new();
        storage.write_points(KEY_POINTS, &[Point::ZERO, Point::new(1.0, 0.0)]);
        let mut line = Line::default();
        let style = ShapeStyle {
            opacity: 0.5,
            ..ShapeStyle::default()
        };
        line.set_style(style.clone());
        line.load(&storage).unwrap();
        assert_eq!(line.style(), &style);

        storage.write_string(KEY_STYLE, "{ broken");
        assert!(matches!(line.load(&storage), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_out_of_range_flags_load_empty() {
        let mut storage = MemoryStorage::new();
        storage.write_points(KEY_POINTS, &[Point::ZERO, Point::new(1.0, 0.0)]);
        storage.write_int(KEY_FLAGS, 1 << 20 | 1 << 1);
        let mut line = Line::default();
        line.load(&storage).unwrap();
        assert_eq!(line.flags(), ShapeFlags::empty());

        storage.write_int(KEY_FLAGS, i64::from(ShapeFlags::CLOSED.bits()));
        line.load(&storage).unwrap();
        assert!(line.is_closed());
    }

    #[test]
    fn test_flags_bits_are_stable() {
        let flags = ShapeFlags::CLOSED | ShapeFlags::HIDDEN;
        assert_eq!(flags.bits(), 0b10_0000_0010);
        assert_eq!(ShapeFlags::from_bits_truncate(flags.bits()), flags);
    }
}
