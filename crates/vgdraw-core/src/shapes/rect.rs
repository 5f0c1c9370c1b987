//! Rectangle shape with corner, edge and center handles.

use super::{DragState, HandleType, Shape, ShapeBase, ShapeFlags};
use kurbo::{Point, Vec2};
use std::any::Any;

/// Number of corner handles; edge midpoints follow, then the center.
const CORNERS: usize = 4;
const CENTER_HANDLE: usize = 8;

/// A possibly rotated rectangle stored as four corners.
///
/// Corners run p0 → p1 along the rectangle's local x axis and p1 → p2
/// along its local y axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectShape {
    base: ShapeBase,
    corners: [Point; 4],
}

/// Rectangle bounds in its own frame: origin at p0, axes `u` and `v`.
#[derive(Debug, Clone, Copy)]
struct LocalFrame {
    origin: Point,
    u: Vec2,
    v: Vec2,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl LocalFrame {
    fn to_local(&self, pt: Point) -> (f64, f64) {
        let d = pt - self.origin;
        (d.dot(self.u), d.dot(self.v))
    }

    fn to_model(&self, x: f64, y: f64) -> Point {
        self.origin + self.u * x + self.v * y
    }

    fn corners(&self) -> [Point; 4] {
        [
            self.to_model(self.x0, self.y0),
            self.to_model(self.x1, self.y0),
            self.to_model(self.x1, self.y1),
            self.to_model(self.x0, self.y1),
        ]
    }
}

/// Move `value` so that its distance from `anchor` becomes `size`, keeping its side.
fn at_distance(anchor: f64, value: f64, size: f64) -> f64 {
    if value < anchor { anchor - size } else { anchor + size }
}

impl RectShape {
    pub const TYPE_TAG: &'static str = "rect";

    /// Create an axis-aligned rectangle from two opposite corners.
    pub fn new(a: Point, b: Point) -> Self {
        let mut rect = Self::default();
        rect.set_rect(a, b);
        rect
    }

    /// Set the rectangle from two opposite corners, axis-aligned.
    ///
    /// With the square flag the shorter side grows to the longer one, away from `a`.
    pub fn set_rect(&mut self, a: Point, b: Point) {
        let b = if self.flag(ShapeFlags::SQUARE) {
            let side = (b.x - a.x).abs().max((b.y - a.y).abs());
            Point::new(at_distance(a.x, b.x, side), at_distance(a.y, b.y, side))
        } else {
            b
        };
        self.corners = [a, Point::new(b.x, a.y), b, Point::new(a.x, b.y)];
        self.update();
    }

    pub fn width(&self) -> f64 {
        self.corners[0].distance(self.corners[1])
    }

    pub fn height(&self) -> f64 {
        self.corners[1].distance(self.corners[2])
    }

    pub fn center(&self) -> Point {
        self.corners[0].midpoint(self.corners[2])
    }

    fn frame(&self) -> LocalFrame {
        let [p0, p1, _, p3] = self.corners;
        let along = p1 - p0;
        let u = if along.hypot() > 0.0 {
            along.normalize()
        } else {
            Vec2::new(1.0, 0.0)
        };
        let v = u.turn_90();
        LocalFrame {
            origin: p0,
            u,
            v,
            x0: 0.0,
            y0: 0.0,
            x1: along.dot(u),
            y1: (p3 - p0).dot(v),
        }
    }

    fn drag_mode(index: usize) -> DragState {
        match index {
            0..CORNERS => DragState::Vertex(index),
            CENTER_HANDLE => DragState::Center,
            _ => DragState::Edge(index - CORNERS),
        }
    }

    fn drag(&mut self, state: DragState, pt: Point) -> bool {
        let mut f = self.frame();
        let (px, py) = f.to_local(pt);
        let square = self.flag(ShapeFlags::SQUARE);
        match state {
            DragState::Idle => return false,
            DragState::Center => {
                let delta = pt - self.center();
                self.corners.iter_mut().for_each(|c| *c += delta);
                self.update();
                return true;
            }
            DragState::Vertex(corner) => {
                let (mut x, mut y) = (px, py);
                let (ox, oy) = match corner {
                    0 => (f.x1, f.y1),
                    1 => (f.x0, f.y1),
                    2 => (f.x0, f.y0),
                    _ => (f.x1, f.y0),
                };
                if square {
                    let side = (x - ox).abs().max((y - oy).abs());
                    x = at_distance(ox, x, side);
                    y = at_distance(oy, y, side);
                }
                match corner {
                    0 => (f.x0, f.y0) = (x, y),
                    1 => (f.x1, f.y0) = (x, y),
                    2 => (f.x1, f.y1) = (x, y),
                    _ => (f.x0, f.y1) = (x, y),
                }
            }
            DragState::Edge(edge) => {
                match edge {
                    0 => f.y0 = py,
                    1 => f.x1 = px,
                    2 => f.y1 = py,
                    _ => f.x0 = px,
                }
                if square {
                    if edge % 2 == 0 {
                        let side = (f.y1 - f.y0).abs();
                        f.x1 = at_distance(f.x0, f.x1, side);
                    } else {
                        let side = (f.x1 - f.x0).abs();
                        f.y1 = at_distance(f.y0, f.y1, side);
                    }
                }
            }
        }
        self.corners = f.corners();
        self.update();
        true
    }
}

impl Shape for RectShape {
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
        CORNERS
    }

    fn point(&self, index: usize) -> Point {
        self.corners[index]
    }

    fn set_point(&mut self, index: usize, pt: Point) {
        self.corners[index] = pt;
    }

    fn clear(&mut self) {
        self.corners = [Point::ZERO; 4];
        self.update();
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn handle_count(&self) -> usize {
        CENTER_HANDLE + 1
    }

    fn handle_point(&self, index: usize) -> Point {
        match index {
            0..CORNERS => self.corners[index],
            CENTER_HANDLE => self.center(),
            _ => {
                let i = index - CORNERS;
                self.corners[i].midpoint(self.corners[(i + 1) % CORNERS])
            }
        }
    }

    fn handle_type(&self, index: usize) -> HandleType {
        match index {
            0..CORNERS => HandleType::Vertex,
            CENTER_HANDLE => HandleType::Center,
            _ => HandleType::Midpoint,
        }
    }

    fn is_handle_fixed(&self, index: usize) -> bool {
        self.flag(ShapeFlags::LOCKED) || (index != CENTER_HANDLE && self.flag(ShapeFlags::FIXED_SIZE))
    }

    fn set_handle_point(&mut self, index: usize, pt: Point, _tol: f64) -> bool {
        if self.is_handle_fixed(index) {
            return false;
        }
        self.drag(Self::drag_mode(index), pt)
    }

    /// The sub-mode is chosen from `index` on the first event and kept afterwards.
    fn set_handle_point2(&mut self, index: usize, pt: Point, _tol: f64, state: DragState) -> (bool, DragState) {
        if self.is_handle_fixed(index) {
            return (false, state);
        }
        let state = match state {
            DragState::Idle => Self::drag_mode(index),
            other => other,
        };
        (self.drag(state, pt), state)
    }
}
