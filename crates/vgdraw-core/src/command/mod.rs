//! Interactive drawing commands.
//!
//! A command turns a stream of pointer events into one committed shape at
//! a time. It keeps a single pending shape for its whole lifetime, resets
//! it between sessions and copies it into the host's container on commit.
//! Step 0 is idle; every release that moves far enough from the previous
//! vertex advances one step until the command's maximum step commits.

mod dot;
mod line;
mod lines;
mod rect;
#[cfg(test)]
pub(crate) mod testing;

pub use dot::DrawDot;
pub use line::DrawLine;
pub use lines::DrawLines;
pub use rect::DrawRect;

use crate::geom::{Tolerance, box_around, box_is_empty, points_equal};
use crate::shapes::{Shape, ShapeId};
use crate::storage::Storage;
use crate::view::{CommandView, Motion};
use kurbo::{Point, Rect};
use thiserror::Error;

/// Command errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Cannot create shape of type {0}")]
    ShapeCreation(String),
    #[error("Factory returned a shape that is not a {0}")]
    WrongShapeKind(&'static str),
}

/// Step counter and pending shape shared by all drawing commands.
#[derive(Debug, Default)]
pub struct DrawSession {
    step: usize,
    shape: Option<Box<dyn Shape>>,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step; 0 when idle.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn set_step(&mut self, step: usize) {
        self.step = step;
    }

    /// The pending shape, once initialized.
    pub fn shape(&self) -> Option<&dyn Shape> {
        self.shape.as_deref()
    }

    pub fn shape_mut(&mut self) -> Option<&mut (dyn Shape + 'static)> {
        self.shape.as_deref_mut()
    }

    /// The pending shape as a concrete kind.
    pub fn shape_as<T: Shape + 'static>(&self) -> Option<&T> {
        self.shape.as_deref().and_then(|s| s.as_any().downcast_ref::<T>())
    }

    pub fn shape_as_mut<T: Shape + 'static>(&mut self) -> Option<&mut T> {
        self.shape
            .as_deref_mut()
            .and_then(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// Start a new session: create the pending shape if needed, then reset it.
    ///
    /// Nothing changes when the factory cannot create `type_tag`.
    pub fn initialize(&mut self, view: &mut dyn CommandView, type_tag: &str) -> Result<(), CommandError> {
        if self.shape.is_none() {
            let Some(shape) = view.factory().create_shape(type_tag) else {
                log::warn!("Cannot create shape of type {type_tag}");
                return Err(CommandError::ShapeCreation(type_tag.to_string()));
            };
            self.shape = Some(shape);
        }
        view.set_new_shape_id(None);
        self.step = 0;
        if let Some(shape) = self.shape.as_deref_mut() {
            shape.clear();
            shape.set_style(view.style());
        }
        Ok(())
    }

    /// Snap `raw` through the host's provider. The first point is snapped without the shape.
    pub fn snap_point(&self, view: &mut dyn CommandView, raw: Point, first_step: bool) -> Point {
        let shape = if first_step { None } else { self.shape.as_deref() };
        view.snap().snap_point(raw, shape, self.step)
    }

    /// Distance under which two step points count as the same, from display millimetres.
    pub fn step_tolerance(&self, view: &dyn CommandView) -> Tolerance {
        let config = view.config();
        Tolerance::new(view.display_mm_to_model(config.step_tolerance_mm), config.tolerance.vector)
    }

    /// Recompute the pending shape's extent.
    pub fn update_shape(&mut self) {
        if let Some(shape) = self.shape.as_deref_mut() {
            shape.update();
        }
    }

    /// Set every vertex of the pending shape to `pt`.
    pub fn set_all_points(&mut self, pt: Point) {
        if let Some(shape) = self.shape.as_deref_mut() {
            for i in 0..shape.point_count() {
                shape.set_point(i, pt);
            }
        }
    }

    /// Extent of the pending shape, zero when there is none.
    pub fn extent(&self) -> Rect {
        self.shape.as_deref().map(|s| s.extent()).unwrap_or(Rect::ZERO)
    }

    /// Commit the pending shape. The pending points are cleared once the copy was added.
    pub fn add_shape(&mut self, view: &mut dyn CommandView, notify: bool) -> Option<ShapeId> {
        let shape = self.shape.as_deref()?;
        let id = commit(view, shape, notify);
        if let Some(pending) = self.shape.as_deref_mut() {
            if id.is_some() {
                pending.clear();
            }
            pending.set_style(view.style());
        }
        id
    }

    /// Commit a shape other than the pending one.
    pub fn add_other_shape(&mut self, view: &mut dyn CommandView, shape: &dyn Shape, notify: bool) -> Option<ShapeId> {
        let id = commit(view, shape, notify);
        if let Some(pending) = self.shape.as_deref_mut() {
            pending.set_style(view.style());
        }
        id
    }

    /// Drop the pending points and return to idle.
    pub fn discard(&mut self) {
        self.step = 0;
        if let Some(shape) = self.shape.as_deref_mut() {
            shape.clear();
        }
    }

    /// Undo the last step while more than one step was made.
    pub fn back_step(&mut self, view: &mut dyn CommandView) -> bool {
        if self.step > 1 {
            self.step -= 1;
            view.redraw();
            return true;
        }
        false
    }

    /// Abandon the running session.
    pub fn cancel(&mut self, view: &mut dyn CommandView) -> bool {
        if self.step == 0 {
            return false;
        }
        self.discard();
        view.snap().clear_snap();
        view.redraw();
        true
    }

    /// Select a committed shape under `motion` and hand over to the selection tool.
    pub fn click_select(&self, view: &mut dyn CommandView, motion: &Motion, command: &str) -> bool {
        let config = view.config();
        let size = view.display_mm_to_model(config.click_hit_mm);
        let limits = box_around(motion.point, size);
        let tol = Tolerance::new(size / 2.0, config.tolerance.vector);
        let Some((id, _)) = view.shapes().hit_test(limits, &tol) else {
            return false;
        };
        view.set_new_shape_id(Some(id));
        view.to_select_command();
        log::debug!("Command ({command}) cancelled after the shape {id} clicked");
        true
    }

    /// The pending shape while a session with points is open.
    pub fn preview(&self) -> Option<&dyn Shape> {
        self.shape
            .as_deref()
            .filter(|s| self.step > 0 && s.point_count() > 0)
    }

    /// Common tail of a press: refresh the style and repaint.
    pub fn began(&mut self, view: &mut dyn CommandView) {
        if let Some(shape) = self.shape.as_deref_mut() {
            shape.set_style(view.style());
        }
        view.redraw();
    }

    /// Common tail of a release: drop the snap indicator and repaint.
    pub fn ended(&self, view: &mut dyn CommandView) {
        view.snap().clear_snap();
        view.redraw();
    }
}

fn commit(view: &mut dyn CommandView, shape: &dyn Shape, notify: bool) -> Option<ShapeId> {
    if !view.shape_will_add(shape) {
        log::debug!("Adding {} shape was vetoed", shape.type_tag());
        return None;
    }
    let id = view.shapes_mut().add_shape(shape);
    view.shape_added(id);
    if notify {
        view.set_new_shape_id(Some(id));
    }
    log::debug!("Added {} shape {id}", shape.type_tag());
    Some(id)
}

/// A drawing command driven by host pointer events.
///
/// Every event handler returns whether the event was consumed.
pub trait Command {
    /// Command name as known to the host.
    fn name(&self) -> &'static str;

    /// Type tag of the shape this command creates.
    fn shape_tag(&self) -> &'static str;

    fn session(&self) -> &DrawSession;
    fn session_mut(&mut self) -> &mut DrawSession;

    /// Prepare a new session; `storage` carries kind-specific parameters.
    fn initialize(&mut self, view: &mut dyn CommandView, _storage: Option<&dyn Storage>) -> Result<(), CommandError> {
        let tag = self.shape_tag();
        self.session_mut().initialize(view, tag)
    }

    /// Step count that commits the shape.
    fn max_step(&self) -> usize {
        3
    }

    /// Whether committed shapes are reported as the host's new shape.
    fn notifies_new_shape(&self) -> bool {
        true
    }

    /// Whether a finished extent is too small to keep.
    fn is_degenerate(&self, extent: Rect, tol: &Tolerance) -> bool {
        box_is_empty(extent, tol, false)
    }

    /// Place the point defining `step`; step 0 points are placed by the caller.
    fn set_step_point(&mut self, step: usize, pt: Point) {
        if step == 0 {
            return;
        }
        if let Some(shape) = self.session_mut().shape_mut() {
            shape.set_handle_point(step, pt, 0.0);
        }
    }

    fn step(&self) -> usize {
        self.session().step()
    }

    fn touch_began(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        touch_began_step(self, view, motion)
    }

    fn touch_moved(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        touch_moved_step(self, view, motion)
    }

    fn touch_ended(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        touch_ended_step(self, view, motion)
    }

    /// Idle clicks select a committed shape; otherwise a click is a press and release.
    fn click(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        if self.step() == 0 {
            let name = self.name();
            self.session().click_select(view, motion, name) || (view.use_finger() && self.long_press(view, motion))
        } else {
            self.touch_began(view, motion) && self.touch_ended(view, motion)
        }
    }

    fn double_click(&mut self, _view: &mut dyn CommandView, _motion: &Motion) -> bool {
        false
    }

    fn long_press(&mut self, view: &mut dyn CommandView, _motion: &Motion) -> bool {
        view.show_in_drawing(self.session().shape())
    }

    fn mouse_hover(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        self.step() > 0 && self.touch_moved(view, motion)
    }

    fn back_step(&mut self, view: &mut dyn CommandView) -> bool {
        self.session_mut().back_step(view)
    }

    fn cancel(&mut self, view: &mut dyn CommandView) -> bool {
        self.session_mut().cancel(view)
    }

    /// The in-progress shape to draw as a preview.
    fn gather(&self) -> Option<&dyn Shape> {
        self.session().preview()
    }
}

/// Press handling of step-driven commands.
pub fn touch_began_step<C: Command + ?Sized>(cmd: &mut C, view: &mut dyn CommandView, motion: &Motion) -> bool {
    if cmd.session().shape().is_none() {
        return false;
    }
    let step = cmd.step();
    if step == 0 {
        cmd.session_mut().set_step(1);
        let pt = cmd.session().snap_point(view, motion.point, true);
        cmd.session_mut().set_all_points(pt);
        cmd.set_step_point(0, pt);
    } else {
        let pt = cmd.session().snap_point(view, motion.point, false);
        cmd.set_step_point(step, pt);
    }
    let session = cmd.session_mut();
    session.update_shape();
    session.began(view);
    true
}

/// Drag handling of step-driven commands; hovering without a press changes nothing.
pub fn touch_moved_step<C: Command + ?Sized>(cmd: &mut C, view: &mut dyn CommandView, motion: &Motion) -> bool {
    let step = cmd.step();
    if motion.dragging && step > 0 {
        let pt = cmd.session().snap_point(view, motion.point, false);
        cmd.set_step_point(step, pt);
        cmd.session_mut().update_shape();
    }
    view.redraw();
    true
}

/// Release handling of step-driven commands.
///
/// Advances when the release moved away from the previous vertex and
/// commits once the maximum step is reached.
pub fn touch_ended_step<C: Command + ?Sized>(cmd: &mut C, view: &mut dyn CommandView, motion: &Motion) -> bool {
    let step = cmd.step();
    if step == 0 {
        cmd.session().ended(view);
        return false;
    }
    let pt = cmd.session().snap_point(view, motion.point, false);
    let tol = cmd.session().step_tolerance(view);
    cmd.set_step_point(step, pt);
    cmd.session_mut().update_shape();

    let previous = cmd.session().shape().map(|s| s.point(step - 1));
    if previous.is_some_and(|prev| !points_equal(pt, prev, &tol)) {
        let next = step + 1;
        if next >= cmd.max_step() {
            let degenerate = cmd.is_degenerate(cmd.session().extent(), &tol);
            let notify = cmd.notifies_new_shape();
            let session = cmd.session_mut();
            if degenerate {
                log::debug!("Discarding degenerate shape");
                session.discard();
            } else {
                session.add_shape(view, notify);
            }
            session.set_step(0);
        } else {
            cmd.session_mut().set_step(next);
        }
    }
    cmd.session().ended(view);
    true
}

/// Create a built-in command by name.
pub fn command_by_name(name: &str) -> Option<Box<dyn Command>> {
    let cmd: Box<dyn Command> = match name {
        "line" => Box::new(DrawLine::new()),
        "rayline" => Box::new(DrawLine::ray()),
        "beeline" => Box::new(DrawLine::beeline()),
        "dot" => Box::new(DrawDot::new()),
        "lines" => Box::new(DrawLines::new()),
        "polygon" => Box::new(DrawLines::polygon()),
        "rect" => Box::new(DrawRect::new()),
        "square" => Box::new(DrawRect::square()),
        _ => return None,
    };
    Some(cmd)
}
