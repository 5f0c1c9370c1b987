//! Snap functionality for aligning points to grid and shapes.

use crate::shapes::{HandleType, Shape, ShapeFlags, handles};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid size for snapping, in model units.
pub const GRID_SIZE: f64 = 20.0;

/// Default distance threshold for shape snapping, in model units.
pub const SHAPE_SNAP_THRESHOLD: f64 = 10.0;

/// Angle snap increment in degrees.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

/// Snap mode for aligning points to grid or other elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapMode {
    /// No snapping.
    #[default]
    None,
    /// Snap to grid intersections.
    Grid,
    /// Snap to other shapes' vertices, midpoints and centers.
    Shapes,
    /// Snap to both grid and shapes.
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Shapes,
            SnapMode::Shapes => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    /// Check if grid snapping is enabled.
    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    /// Check if shape snapping is enabled.
    pub fn snaps_to_shapes(self) -> bool {
        matches!(self, SnapMode::Shapes | SnapMode::All)
    }

    /// Check if any snapping is enabled.
    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// What the point was snapped to, if anything.
    pub kind: Option<SnapTargetKind>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self { point, kind: None }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.kind.is_some()
    }
}

/// Result of an angle snap operation.
#[derive(Debug, Clone, Copy)]
pub struct AngleSnapResult {
    /// The snapped endpoint.
    pub point: Point,
    /// The snapped angle in degrees (0-360).
    pub angle_degrees: f64,
    /// The original (unsnapped) angle in degrees.
    pub original_angle_degrees: f64,
    /// Whether angle snapping occurred.
    pub snapped: bool,
    /// Distance from start point (preserved from original).
    pub distance: f64,
}

/// Normalize an angle in degrees to [0, 360).
fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 { 0.0 } else { a }
}

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    normalize_degrees((angle_degrees / increment).round() * increment)
}

/// Snap a line endpoint to angle increments from a start point.
/// This snaps the angle while preserving the distance from start.
pub fn snap_line_endpoint(start: Point, end: Point, angle_snap_enabled: bool) -> AngleSnapResult {
    let delta = end - start;
    let distance = delta.hypot();

    // Zero-length has no direction.
    if distance < 0.001 {
        return AngleSnapResult {
            point: end,
            angle_degrees: 0.0,
            original_angle_degrees: 0.0,
            snapped: false,
            distance: 0.0,
        };
    }

    let original = normalize_degrees(delta.y.atan2(delta.x).to_degrees());
    if !angle_snap_enabled {
        return AngleSnapResult {
            point: end,
            angle_degrees: original,
            original_angle_degrees: original,
            snapped: false,
            distance,
        };
    }

    let snapped_angle = snap_angle(original, ANGLE_SNAP_INCREMENT);
    let rad = snapped_angle.to_radians();
    AngleSnapResult {
        point: Point::new(start.x + distance * rad.cos(), start.y + distance * rad.sin()),
        angle_degrees: snapped_angle,
        original_angle_degrees: original,
        snapped: true,
        distance,
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    SnapResult {
        point: Point::new(
            (point.x / grid_size).round() * grid_size,
            (point.y / grid_size).round() * grid_size,
        ),
        kind: Some(SnapTargetKind::Grid),
    }
}

/// A point that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// The snap point location.
    pub point: Point,
    /// Type of snap target for visual feedback.
    pub kind: SnapTargetKind,
}

/// Type of snap target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTargetKind {
    /// Vertex of a shape.
    Corner,
    /// Midpoint of an edge.
    Midpoint,
    /// Center of a shape.
    Center,
    /// Vertex of the shape being drawn.
    Drawing,
    /// Grid intersection.
    Grid,
    /// Angle increment from the previous vertex.
    Angle,
}

/// Collect snap targets from a shape's handles.
pub fn snap_targets_of(shape: &dyn Shape) -> Vec<SnapTarget> {
    handles(shape)
        .into_iter()
        .filter_map(|h| {
            let kind = match h.kind {
                HandleType::Vertex => SnapTargetKind::Corner,
                HandleType::Midpoint => SnapTargetKind::Midpoint,
                HandleType::Center => SnapTargetKind::Center,
                HandleType::OutsidePoint => return None,
            };
            Some(SnapTarget { point: h.position, kind })
        })
        .collect()
}

/// Snap a point to the nearest target within `threshold`.
pub fn snap_to_shapes(point: Point, targets: &[SnapTarget], threshold: f64) -> SnapResult {
    let mut best: Option<&SnapTarget> = None;
    let mut best_dist_sq = threshold * threshold;

    for target in targets {
        let dist_sq = (point - target.point).hypot2();
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(target);
        }
    }

    match best {
        Some(target) => SnapResult {
            point: target.point,
            kind: Some(target.kind),
        },
        None => SnapResult::none(point),
    }
}

/// Maps raw input points to snapped points while a shape is drawn.
pub trait SnapProvider {
    /// Snap `raw` for vertex `step` of `shape`; `shape` is `None` for the first point.
    fn snap_point(&mut self, raw: Point, shape: Option<&dyn Shape>, step: usize) -> Point;

    /// Forget the current snap indicator.
    fn clear_snap(&mut self);
}

/// Provider that returns points unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnap;

impl SnapProvider for NoSnap {
    fn snap_point(&mut self, raw: Point, _shape: Option<&dyn Shape>, _step: usize) -> Point {
        raw
    }

    fn clear_snap(&mut self) {}
}

/// Snap provider over grid, existing shapes and the vertices already placed.
#[derive(Debug, Clone)]
pub struct SnapEngine {
    pub mode: SnapMode,
    pub grid_size: f64,
    /// Shape snap distance in model units.
    pub threshold: f64,
    /// Snap the direction from the previous vertex to angle increments.
    pub angle_snap: bool,
    targets: Vec<SnapTarget>,
    last: Option<SnapResult>,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new(SnapMode::default())
    }
}

impl SnapEngine {
    pub fn new(mode: SnapMode) -> Self {
        Self {
            mode,
            grid_size: GRID_SIZE,
            threshold: SHAPE_SNAP_THRESHOLD,
            angle_snap: false,
            targets: Vec::new(),
            last: None,
        }
    }

    /// Replace the targets with those of the given shapes, skipping hidden
    /// and no-snap ones.
    pub fn set_targets_from<'a>(&mut self, shapes: impl IntoIterator<Item = &'a dyn Shape>) {
        self.targets = shapes
            .into_iter()
            .filter(|s| !s.flag(ShapeFlags::HIDDEN) && !s.flag(ShapeFlags::NO_SNAP))
            .flat_map(snap_targets_of)
            .collect();
    }

    pub fn targets(&self) -> &[SnapTarget] {
        &self.targets
    }

    /// Indicator of the most recent snap, until cleared.
    pub fn last_snap(&self) -> Option<SnapResult> {
        self.last
    }

    /// Kind of the most recent snap, until cleared.
    pub fn snapped_kind(&self) -> Option<SnapTargetKind> {
        self.last.and_then(|r| r.kind)
    }

    fn snap(&self, raw: Point, shape: Option<&dyn Shape>, step: usize) -> SnapResult {
        if self.mode.snaps_to_shapes() {
            let mut targets = self.targets.clone();
            if let Some(shape) = shape.filter(|s| !s.flag(ShapeFlags::NO_SNAP)) {
                targets.extend((0..step.min(shape.point_count())).map(|i| SnapTarget {
                    point: shape.point(i),
                    kind: SnapTargetKind::Drawing,
                }));
            }
            let res = snap_to_shapes(raw, &targets, self.threshold);
            if res.is_snapped() {
                return res;
            }
        }
        let previous = shape.filter(|s| step > 0 && step <= s.point_count()).map(|s| s.point(step - 1));
        if let (true, Some(prev)) = (self.angle_snap, previous) {
            let res = snap_line_endpoint(prev, raw, true);
            if res.snapped {
                return SnapResult {
                    point: res.point,
                    kind: Some(SnapTargetKind::Angle),
                };
            }
        }
        if self.mode.snaps_to_grid() {
            return snap_to_grid(raw, self.grid_size);
        }
        SnapResult::none(raw)
    }
}

impl SnapProvider for SnapEngine {
    fn snap_point(&mut self, raw: Point, shape: Option<&dyn Shape>, step: usize) -> Point {
        let res = self.snap(raw, shape, step);
        self.last = res.is_snapped().then_some(res);
        res.point
    }

    fn clear_snap(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Lines, RectShape};

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(23.0, 47.0), 20.0);
        assert_eq!(result.point, Point::new(20.0, 40.0));
        assert_eq!(result.kind, Some(SnapTargetKind::Grid));
    }

    #[test]
    fn test_snap_to_grid_round_up() {
        let result = snap_to_grid(Point::new(31.0, 51.0), 20.0);
        assert_eq!(result.point, Point::new(40.0, 60.0));
    }

    #[test]
    fn test_snap_mode_cycle() {
        assert_eq!(SnapMode::None.next(), SnapMode::Grid);
        assert_eq!(SnapMode::Grid.next(), SnapMode::Shapes);
        assert_eq!(SnapMode::Shapes.next(), SnapMode::All);
        assert_eq!(SnapMode::All.next(), SnapMode::None);
    }

    #[test]
    fn test_snap_mode_flags() {
        assert!(!SnapMode::None.snaps_to_grid());
        assert!(SnapMode::Grid.snaps_to_grid());
        assert!(!SnapMode::Shapes.snaps_to_grid());
        assert!(SnapMode::All.snaps_to_shapes());
        assert!(!SnapMode::None.is_enabled());
    }

    #[test]
    fn test_snap_angle() {
        assert!((snap_angle(7.0, 15.0) - 0.0).abs() < 0.01);
        assert!((snap_angle(8.0, 15.0) - 15.0).abs() < 0.01);
        assert!((snap_angle(23.0, 15.0) - 30.0).abs() < 0.01);
        assert!((snap_angle(359.0, 15.0) - 0.0).abs() < 0.01);
        assert!((snap_angle(-10.0, 15.0) - 345.0).abs() < 0.01);
    }

    #[test]
    fn test_snap_line_endpoint_preserves_distance() {
        let result = snap_line_endpoint(Point::ZERO, Point::new(100.0, 102.0), true);
        assert!(result.snapped);
        assert!((result.angle_degrees - 45.0).abs() < 0.01);
        let original = (100.0f64 * 100.0 + 102.0 * 102.0).sqrt();
        assert!((result.distance - original).abs() < 1e-9);
        assert!((result.point.x - result.point.y).abs() < 1e-9);
    }

    #[test]
    fn test_snap_line_endpoint_disabled() {
        let end = Point::new(100.0, 5.0);
        let result = snap_line_endpoint(Point::ZERO, end, false);
        assert!(!result.snapped);
        assert_eq!(result.point, end);
    }

    #[test]
    fn test_snap_targets_of_rect() {
        let rect = RectShape::new(Point::new(0.0, 0.0), Point::new(4.0, 2.0));
        let targets = snap_targets_of(&rect);
        assert_eq!(targets.len(), 9);
        assert_eq!(targets.iter().filter(|t| t.kind == SnapTargetKind::Corner).count(), 4);
        assert!(targets.contains(&SnapTarget {
            point: Point::new(2.0, 1.0),
            kind: SnapTargetKind::Center
        }));
    }

    #[test]
    fn test_engine_prefers_shape_targets_over_grid() {
        let mut engine = SnapEngine::new(SnapMode::All);
        let line = Line::new(Point::new(3.0, 3.0), Point::new(50.0, 3.0));
        engine.set_targets_from([&line as &dyn Shape]);
        let pt = engine.snap_point(Point::new(5.0, 4.0), None, 0);
        assert_eq!(pt, Point::new(3.0, 3.0));
        assert_eq!(engine.snapped_kind(), Some(SnapTargetKind::Corner));

        let pt = engine.snap_point(Point::new(81.0, 99.0), None, 0);
        assert_eq!(pt, Point::new(80.0, 100.0));
        assert_eq!(engine.snapped_kind(), Some(SnapTargetKind::Grid));

        engine.clear_snap();
        assert!(engine.last_snap().is_none());
    }

    #[test]
    fn test_engine_snaps_to_placed_vertices_only() {
        let mut engine = SnapEngine::new(SnapMode::Shapes);
        let drawing = Lines::new(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(200.0, 0.0)], false);
        // Vertex 2 is the one being placed, so only 0 and 1 attract.
        let pt = engine.snap_point(Point::new(198.0, 1.0), Some(&drawing), 2);
        assert_eq!(pt, Point::new(198.0, 1.0));
        let pt = engine.snap_point(Point::new(2.0, 1.0), Some(&drawing), 2);
        assert_eq!(pt, Point::ZERO);
        assert_eq!(engine.snapped_kind(), Some(SnapTargetKind::Drawing));
    }

    #[test]
    fn test_engine_skips_no_snap_shapes() {
        let mut engine = SnapEngine::new(SnapMode::Shapes);
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(50.0, 0.0));
        line.set_flag(ShapeFlags::NO_SNAP, true);
        engine.set_targets_from([&line as &dyn Shape]);
        assert!(engine.targets().is_empty());
    }

    #[test]
    fn test_engine_angle_snap_from_previous_vertex() {
        let mut engine = SnapEngine::new(SnapMode::None);
        engine.angle_snap = true;
        let line = Line::new(Point::ZERO, Point::ZERO);
        let pt = engine.snap_point(Point::new(100.0, 5.0), Some(&line), 1);
        assert!(pt.y.abs() < 1e-9);
        assert_eq!(engine.snapped_kind(), Some(SnapTargetKind::Angle));
        // The first point has no previous vertex.
        let pt = engine.snap_point(Point::new(100.0, 5.0), None, 0);
        assert_eq!(pt, Point::new(100.0, 5.0));
        assert!(engine.snapped_kind().is_none());
    }

    #[test]
    fn test_no_snap_passthrough() {
        let mut snap = NoSnap;
        assert_eq!(snap.snap_point(Point::new(1.5, 2.5), None, 0), Point::new(1.5, 2.5));
    }
}
