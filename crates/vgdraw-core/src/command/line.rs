//! Line, ray and infinite line drawing.

use super::{Command, CommandError, DrawSession};
use crate::shapes::{Line, LineMode, Shape};
use crate::storage::Storage;
use crate::view::{CommandView, MSG_SHAPE_TOO_SMALL, Motion};

/// Draws a line with one press-drag-release gesture.
#[derive(Debug)]
pub struct DrawLine {
    session: DrawSession,
    mode: LineMode,
    /// Minimum committed length in model units; `None` uses the configured
    /// display distance.
    pub min_length: Option<f64>,
}

impl Default for DrawLine {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawLine {
    /// Draw line segments.
    pub fn new() -> Self {
        Self::with_mode(LineMode::Segment)
    }

    /// Draw rays.
    pub fn ray() -> Self {
        Self::with_mode(LineMode::Ray)
    }

    /// Draw infinite lines.
    pub fn beeline() -> Self {
        Self::with_mode(LineMode::Beeline)
    }

    fn with_mode(mode: LineMode) -> Self {
        Self {
            session: DrawSession::new(),
            mode,
            min_length: None,
        }
    }

    pub fn mode(&self) -> LineMode {
        self.mode
    }

    fn min_length(&self, view: &dyn CommandView) -> f64 {
        self.min_length
            .unwrap_or_else(|| view.display_mm_to_model(view.config().min_line_length_mm))
    }
}

impl Command for DrawLine {
    fn name(&self) -> &'static str {
        match self.mode {
            LineMode::Segment => "line",
            LineMode::Ray => "rayline",
            LineMode::Beeline => "beeline",
        }
    }

    fn shape_tag(&self) -> &'static str {
        Line::TYPE_TAG
    }

    fn session(&self) -> &DrawSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut DrawSession {
        &mut self.session
    }

    fn initialize(&mut self, view: &mut dyn CommandView, _storage: Option<&dyn Storage>) -> Result<(), CommandError> {
        self.session.initialize(view, Line::TYPE_TAG)?;
        if self.session.shape_as::<Line>().is_none() {
            log::warn!("Factory created a non-line shape for {}", self.name());
            self.session.shape = None;
            return Err(CommandError::WrongShapeKind(Line::TYPE_TAG));
        }
        let mode = self.mode;
        if let Some(line) = self.session.shape_as_mut::<Line>() {
            line.set_mode(mode);
        }
        Ok(())
    }

    fn max_step(&self) -> usize {
        2
    }

    fn touch_began(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        if self.session.shape().is_none() {
            return false;
        }
        self.session.set_step(1);
        let pt = self.session.snap_point(view, motion.point, true);
        self.session.set_all_points(pt);
        self.session.update_shape();
        self.session.began(view);
        true
    }

    fn touch_moved(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        if self.session.step() == 0 {
            return false;
        }
        let pt = self.session.snap_point(view, motion.point, false);
        if let Some(line) = self.session.shape_mut() {
            line.set_point(1, pt);
            line.update();
        }
        view.redraw();
        true
    }

    /// Commits when the line is long enough, otherwise tells the user and drops it.
    ///
    /// The end point stays where the last move left it; the release position
    /// is not snapped or applied.
    fn touch_ended(&mut self, view: &mut dyn CommandView, _motion: &Motion) -> bool {
        if self.session.step() == 0 {
            self.session.ended(view);
            return false;
        }
        let min = self.min_length(view);
        let length = self.session.shape_as::<Line>().map_or(0.0, Line::length);
        if length >= min {
            self.session.add_shape(view, true);
        } else {
            view.show_message(MSG_SHAPE_TOO_SMALL);
            self.session.discard();
        }
        self.session.set_step(0);
        self.session.ended(view);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::MockView;
    use crate::factory::BasicShapeFactory;
    use crate::shapes::Dot;
    use crate::snap::SnapMode;
    use kurbo::Point;

    fn line_command(view: &mut MockView, min_length: Option<f64>) -> DrawLine {
        let mut cmd = DrawLine::new();
        cmd.min_length = min_length;
        cmd.initialize(view, None).unwrap();
        cmd
    }

    #[test]
    fn test_short_line_is_rejected() {
        let mut view = MockView::new();
        let mut cmd = line_command(&mut view, Some(0.2));
        cmd.touch_began(&mut view, &Motion::at(Point::new(0.0, 0.0)));
        cmd.touch_moved(&mut view, &Motion::drag(Point::ZERO, Point::new(0.0, 0.05)));
        assert!(cmd.touch_ended(&mut view, &Motion::at(Point::new(0.0, 0.05))));

        assert_eq!(view.messages, vec![MSG_SHAPE_TOO_SMALL.to_string()]);
        assert_eq!(cmd.step(), 0);
        assert_eq!(view.shapes.len(), 0);
        assert!(cmd.gather().is_none());
    }

    #[test]
    fn test_long_line_is_committed() {
        let mut view = MockView::new();
        let mut cmd = line_command(&mut view, Some(0.2));
        cmd.touch_began(&mut view, &Motion::at(Point::new(0.0, 0.0)));
        cmd.touch_moved(&mut view, &Motion::drag(Point::ZERO, Point::new(5.0, 0.0)));
        cmd.touch_ended(&mut view, &Motion::at(Point::new(5.0, 0.0)));

        assert_eq!(cmd.step(), 0);
        assert_eq!(view.committed(), vec![vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]]);
        assert_eq!(view.new_shape_id, Some(view.shapes.ids()[0]));
        assert!(view.messages.is_empty());
    }

    #[test]
    fn test_release_point_is_not_applied() {
        let mut view = MockView::new();
        let mut cmd = line_command(&mut view, Some(0.2));
        cmd.touch_began(&mut view, &Motion::at(Point::new(0.0, 0.0)));
        cmd.touch_moved(&mut view, &Motion::drag(Point::ZERO, Point::new(5.0, 0.0)));
        cmd.touch_ended(&mut view, &Motion::at(Point::new(9.0, 3.0)));
        assert_eq!(view.committed(), vec![vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]]);
    }

    #[test]
    fn test_min_length_is_inclusive() {
        let mut view = MockView::new();
        let mut cmd = line_command(&mut view, Some(0.5));
        cmd.touch_began(&mut view, &Motion::at(Point::new(0.0, 0.0)));
        cmd.touch_moved(&mut view, &Motion::drag(Point::ZERO, Point::new(0.5, 0.0)));
        cmd.touch_ended(&mut view, &Motion::at(Point::new(0.5, 0.0)));
        assert_eq!(view.shapes.len(), 1);
    }

    #[test]
    fn test_default_min_length_uses_display_distance() {
        // 2 mm is 0.2 model units in the mock view.
        let mut view = MockView::new();
        let mut cmd = line_command(&mut view, None);
        cmd.touch_began(&mut view, &Motion::at(Point::new(0.0, 0.0)));
        cmd.touch_moved(&mut view, &Motion::drag(Point::ZERO, Point::new(0.15, 0.0)));
        cmd.touch_ended(&mut view, &Motion::at(Point::new(0.15, 0.0)));
        assert_eq!(view.shapes.len(), 0);
        assert_eq!(view.messages.len(), 1);
    }

    #[test]
    fn test_cancel_after_began() {
        let mut view = MockView::new();
        let mut cmd = line_command(&mut view, None);
        cmd.touch_began(&mut view, &Motion::at(Point::new(3.0, 4.0)));
        assert!(cmd.cancel(&mut view));
        assert_eq!(cmd.step(), 0);
        assert_eq!(cmd.session().shape().unwrap().points(), vec![Point::ZERO; 2]);
        assert!(!cmd.cancel(&mut view));
    }

    #[test]
    fn test_ray_and_beeline_modes() {
        let mut view = MockView::new();
        for (mut cmd, mode) in [(DrawLine::ray(), LineMode::Ray), (DrawLine::beeline(), LineMode::Beeline)] {
            cmd.initialize(&mut view, None).unwrap();
            cmd.touch_began(&mut view, &Motion::at(Point::new(0.0, 0.0)));
            cmd.touch_moved(&mut view, &Motion::drag(Point::ZERO, Point::new(0.0, 3.0)));
            cmd.touch_ended(&mut view, &Motion::at(Point::new(0.0, 3.0)));
            let id = view.new_shape_id.unwrap();
            let shape = view.shapes.get_mut(id).unwrap();
            let line = shape.as_any().downcast_ref::<Line>().unwrap();
            assert_eq!(line.mode(), mode);
        }
        assert_eq!(view.shapes.len(), 2);
    }

    #[test]
    fn test_snapped_start_point() {
        let mut view = MockView::new();
        view.snap.mode = SnapMode::Grid;
        view.snap.grid_size = 1.0;
        let mut cmd = line_command(&mut view, None);
        cmd.touch_began(&mut view, &Motion::at(Point::new(0.2, 0.3)));
        cmd.touch_moved(&mut view, &Motion::drag(Point::ZERO, Point::new(4.6, 0.1)));
        cmd.touch_ended(&mut view, &Motion::at(Point::new(4.6, 0.1)));
        assert_eq!(view.committed(), vec![vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]]);
        // The release clears the indicator.
        assert!(view.snap.last_snap().is_none());
    }

    #[test]
    fn test_wrong_shape_kind_from_factory() {
        let mut view = MockView::new();
        let mut factory = BasicShapeFactory::empty();
        factory.register(Line::TYPE_TAG, || Box::new(Dot::default()));
        view.factory = factory;
        let mut cmd = DrawLine::new();
        assert_eq!(cmd.initialize(&mut view, None), Err(CommandError::WrongShapeKind("line")));
        assert!(cmd.session().shape().is_none());
    }
}
