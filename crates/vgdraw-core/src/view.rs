//! Host view context seen by drawing commands.

use crate::container::ShapeContainer;
use crate::factory::ShapeFactory;
use crate::geom::Tolerance;
use crate::shapes::{Shape, ShapeId};
use crate::snap::SnapProvider;
use crate::style::ShapeStyle;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default side of the click selection box, in display millimetres.
pub const CLICK_HIT_MM: f64 = 10.0;
/// Default minimum motion that advances a step, in display millimetres.
pub const STEP_TOLERANCE_MM: f64 = 2.0;
/// Default minimum line length, in display millimetres.
pub const MIN_LINE_LENGTH_MM: f64 = 2.0;

/// Message shown when a drawn shape is too small to keep.
pub const MSG_SHAPE_TOO_SMALL: &str = "@shape_too_small";

/// One pointer event in model coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    /// Current point.
    pub point: Point,
    /// Point where the gesture started.
    pub start_point: Point,
    /// Whether the pointer is pressed and moving.
    pub dragging: bool,
}

impl Motion {
    /// A press or release at `point`.
    pub fn at(point: Point) -> Self {
        Self {
            point,
            start_point: point,
            dragging: false,
        }
    }

    /// A drag from `start_point` that reached `point`.
    pub fn drag(start_point: Point, point: Point) -> Self {
        Self {
            point,
            start_point,
            dragging: true,
        }
    }
}

/// Drawing command settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Side of the click selection box, in display millimetres.
    pub click_hit_mm: f64,
    /// Minimum motion that advances a step, in display millimetres.
    pub step_tolerance_mm: f64,
    /// Minimum committed line length, in display millimetres.
    pub min_line_length_mm: f64,
    /// Geometry tolerance; commands replace its point distance with the
    /// millimetre settings above and keep its vector ratio.
    pub tolerance: Tolerance,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            click_hit_mm: CLICK_HIT_MM,
            step_tolerance_mm: STEP_TOLERANCE_MM,
            min_line_length_mm: MIN_LINE_LENGTH_MM,
            tolerance: Tolerance::default(),
        }
    }
}

/// Everything a drawing command needs from its host.
///
/// The view is passed to every command call, so commands never hold a
/// reference back to it.
pub trait CommandView {
    /// Convert a display distance in millimetres to model units.
    fn display_mm_to_model(&self, mm: f64) -> f64;

    /// Current drawing style applied to new shapes.
    fn style(&self) -> ShapeStyle;

    fn factory(&self) -> &dyn ShapeFactory;

    /// Container receiving committed shapes.
    fn shapes(&self) -> &dyn ShapeContainer;

    fn shapes_mut(&mut self) -> &mut dyn ShapeContainer;

    fn snap(&mut self) -> &mut dyn SnapProvider;

    /// Request a repaint.
    fn redraw(&mut self);

    /// Show a user-visible message; keys start with `@`.
    fn show_message(&mut self, message: &str);

    fn config(&self) -> DrawConfig {
        DrawConfig::default()
    }

    /// Veto hook before a shape is committed.
    fn shape_will_add(&mut self, _shape: &dyn Shape) -> bool {
        true
    }

    /// Hook after a shape was committed.
    fn shape_added(&mut self, _id: ShapeId) {}

    /// Report the id of the last committed or selected shape; `None` clears it.
    fn set_new_shape_id(&mut self, _id: Option<ShapeId>) {}

    /// Switch the host to selection mode.
    fn to_select_command(&mut self) {}

    /// Whether input comes from a finger rather than a mouse.
    fn use_finger(&self) -> bool {
        true
    }

    /// Offer context actions while drawing; returns true if something was shown.
    fn show_in_drawing(&mut self, _shape: Option<&dyn Shape>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_config_defaults() {
        let config = DrawConfig::default();
        assert_eq!(config.click_hit_mm, 10.0);
        assert_eq!(config.step_tolerance_mm, 2.0);
        assert_eq!(config.min_line_length_mm, 2.0);
    }

    #[test]
    fn test_draw_config_partial_json() {
        let config: DrawConfig = serde_json::from_str(r#"{"min_line_length_mm": 5.0}"#).unwrap();
        assert_eq!(config.min_line_length_mm, 5.0);
        assert_eq!(config.click_hit_mm, 10.0);
        assert_eq!(config.tolerance, Tolerance::default());
    }

    #[test]
    fn test_motion_constructors() {
        let m = Motion::drag(Point::ZERO, Point::new(1.0, 2.0));
        assert!(m.dragging);
        assert_eq!(m.start_point, Point::ZERO);
        assert!(!Motion::at(Point::new(1.0, 1.0)).dragging);
    }
}
