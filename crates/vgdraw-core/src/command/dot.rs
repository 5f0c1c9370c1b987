//! Dot drawing.

use super::{Command, CommandError, DrawSession};
use crate::shapes::{Dot, Shape};
use crate::storage::Storage;
use crate::view::{CommandView, Motion};

/// Places one dot per tap; the dot follows the pointer until release.
#[derive(Debug, Default)]
pub struct DrawDot {
    session: DrawSession,
}

impl DrawDot {
    pub fn new() -> Self {
        Self::default()
    }

    fn place(&mut self, view: &mut dyn CommandView, motion: &Motion, first_step: bool) {
        let pt = self.session.snap_point(view, motion.point, first_step);
        if let Some(dot) = self.session.shape_mut() {
            dot.set_point(0, pt);
            dot.update();
        }
    }
}

impl Command for DrawDot {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn shape_tag(&self) -> &'static str {
        Dot::TYPE_TAG
    }

    fn session(&self) -> &DrawSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut DrawSession {
        &mut self.session
    }

    /// Reads the marker type from `"pttype"`.
    fn initialize(&mut self, view: &mut dyn CommandView, storage: Option<&dyn Storage>) -> Result<(), CommandError> {
        self.session.initialize(view, Dot::TYPE_TAG)?;
        if let (Some(storage), Some(dot)) = (storage, self.session.shape_as_mut::<Dot>()) {
            dot.point_type = Dot::read_point_type(storage, 0);
        }
        Ok(())
    }

    fn max_step(&self) -> usize {
        1
    }

    fn touch_began(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        if self.session.shape().is_none() {
            return false;
        }
        self.session.set_step(1);
        self.place(view, motion, true);
        self.session.began(view);
        true
    }

    fn touch_moved(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        if self.session.step() == 0 {
            return false;
        }
        self.place(view, motion, false);
        view.redraw();
        true
    }

    fn touch_ended(&mut self, view: &mut dyn CommandView, _motion: &Motion) -> bool {
        if self.session.step() == 0 {
            self.session.ended(view);
            return false;
        }
        self.session.add_shape(view, true);
        self.session.set_step(0);
        self.session.ended(view);
        true
    }

    /// A tap places and commits a dot at once.
    fn click(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        self.touch_began(view, motion) && self.touch_ended(view, motion)
    }
}
