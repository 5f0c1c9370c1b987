//! Rectangle drawing.

use super::{Command, CommandError, DrawSession};
use crate::geom::{Tolerance, box_is_empty};
use crate::shapes::{RectShape, Shape, ShapeFlags};
use crate::storage::Storage;
use crate::view::CommandView;
use kurbo::{Point, Rect};

/// Storage key selecting square mode.
pub const KEY_SQUARE: &str = "square";

/// Draws an axis-aligned rectangle by dragging from one corner to the opposite one.
#[derive(Debug, Default)]
pub struct DrawRect {
    session: DrawSession,
    square: bool,
}

impl DrawRect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw squares.
    pub fn square() -> Self {
        Self {
            square: true,
            ..Self::default()
        }
    }
}

impl Command for DrawRect {
    fn name(&self) -> &'static str {
        if self.square { "square" } else { "rect" }
    }

    fn shape_tag(&self) -> &'static str {
        RectShape::TYPE_TAG
    }

    fn session(&self) -> &DrawSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut DrawSession {
        &mut self.session
    }

    /// `"square"` in storage overrides the square mode.
    fn initialize(&mut self, view: &mut dyn CommandView, storage: Option<&dyn Storage>) -> Result<(), CommandError> {
        self.session.initialize(view, RectShape::TYPE_TAG)?;
        if let Some(storage) = storage {
            self.square = storage.read_bool(KEY_SQUARE, self.square);
        }
        let square = self.square;
        match self.session.shape_as_mut::<RectShape>() {
            Some(rect) => {
                rect.set_flag(ShapeFlags::SQUARE, square);
                Ok(())
            }
            None => {
                self.session.shape = None;
                Err(CommandError::WrongShapeKind(RectShape::TYPE_TAG))
            }
        }
    }

    fn max_step(&self) -> usize {
        2
    }

    /// A rectangle is degenerate once either side collapses.
    fn is_degenerate(&self, extent: Rect, tol: &Tolerance) -> bool {
        box_is_empty(extent, tol, true)
    }

    fn set_step_point(&mut self, step: usize, pt: Point) {
        if step == 0 {
            return;
        }
        if let Some(rect) = self.session.shape_as_mut::<RectShape>() {
            let anchor = rect.point(0);
            rect.set_rect(anchor, pt);
        }
    }
}
