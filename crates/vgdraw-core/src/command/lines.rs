//! Polyline and polygon drawing.

use super::{Command, CommandError, DrawSession};
use crate::geom::{Tolerance, box_is_empty, points_equal};
use crate::shapes::{Lines, Shape};
use crate::storage::Storage;
use crate::view::{CommandView, Motion};

/// Gathers one vertex per release.
///
/// While drawing, the shape holds the placed vertices plus a rubber-band
/// point at index `step` that follows the pointer. A polygon closes when a
/// release lands on its first vertex; a double click finishes either kind.
#[derive(Debug)]
pub struct DrawLines {
    session: DrawSession,
    closed: bool,
    /// Commit automatically once this many vertices are placed.
    pub max_vertices: Option<usize>,
}

impl Default for DrawLines {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawLines {
    /// Draw open polylines.
    pub fn new() -> Self {
        Self {
            session: DrawSession::new(),
            closed: false,
            max_vertices: None,
        }
    }

    /// Draw closed polygons.
    pub fn polygon() -> Self {
        Self {
            closed: true,
            ..Self::new()
        }
    }

    fn min_vertices(&self) -> usize {
        if self.closed { 3 } else { 2 }
    }

    fn lines_mut(&mut self) -> Option<&mut Lines> {
        self.session.shape_as_mut::<Lines>()
    }

    /// Keep the first `count` vertices and commit them if they make a shape.
    fn finish(&mut self, view: &mut dyn CommandView, count: usize, tol: &Tolerance) {
        let min = self.min_vertices();
        let keep = match self.lines_mut() {
            Some(lines) => {
                lines.resize(count);
                lines.update();
                count >= min && !box_is_empty(lines.extent(), tol, false)
            }
            None => false,
        };
        if keep {
            self.session.add_shape(view, true);
        } else {
            log::debug!("Discarding {} with {count} vertices", self.name());
        }
        self.session.discard();
    }
}

impl Command for DrawLines {
    fn name(&self) -> &'static str {
        if self.closed { "polygon" } else { "lines" }
    }

    fn shape_tag(&self) -> &'static str {
        Lines::TYPE_TAG
    }

    fn session(&self) -> &DrawSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut DrawSession {
        &mut self.session
    }

    fn initialize(&mut self, view: &mut dyn CommandView, _storage: Option<&dyn Storage>) -> Result<(), CommandError> {
        self.session.initialize(view, Lines::TYPE_TAG)?;
        let closed = self.closed;
        match self.lines_mut() {
            Some(lines) => {
                lines.set_closed(closed);
                Ok(())
            }
            None => {
                log::warn!("Factory created a non-polyline shape for {}", self.name());
                self.session.shape = None;
                Err(CommandError::WrongShapeKind(Lines::TYPE_TAG))
            }
        }
    }

    fn max_step(&self) -> usize {
        usize::MAX
    }

    fn touch_began(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        if self.session.shape_as::<Lines>().is_none() {
            return false;
        }
        let step = self.session.step();
        if step == 0 {
            self.session.set_step(1);
        }
        let pt = self.session.snap_point(view, motion.point, step == 0);
        let Some(lines) = self.lines_mut() else {
            return false;
        };
        if step == 0 {
            lines.clear();
            lines.add_point(pt);
            lines.add_point(pt);
        } else {
            lines.set_point(step, pt);
            lines.update();
        }
        self.session.began(view);
        true
    }

    fn touch_ended(&mut self, view: &mut dyn CommandView, motion: &Motion) -> bool {
        let step = self.session.step();
        if step == 0 {
            self.session.ended(view);
            return false;
        }
        let pt = self.session.snap_point(view, motion.point, false);
        let tol = self.session.step_tolerance(view);
        let closed = self.closed;
        let max_vertices = self.max_vertices;
        let Some(lines) = self.lines_mut() else {
            return false;
        };
        lines.set_point(step, pt);
        lines.update();

        if !points_equal(pt, lines.point(step - 1), &tol) {
            if closed && step >= 3 && points_equal(pt, lines.point(0), &tol) {
                self.finish(view, step, &tol);
            } else if max_vertices.is_some_and(|max| step + 1 >= max) {
                self.finish(view, step + 1, &tol);
            } else {
                lines.add_point(pt);
                self.session.set_step(step + 1);
            }
        }
        self.session.ended(view);
        true
    }

    /// Finishes with the vertices placed so far, dropping the rubber-band point.
    fn double_click(&mut self, view: &mut dyn CommandView, _motion: &Motion) -> bool {
        let step = self.session.step();
        if step == 0 {
            return false;
        }
        let tol = self.session.step_tolerance(view);
        let mut count = step;
        if let Some(lines) = self.session.shape() {
            if count >= 2 && points_equal(lines.point(count - 1), lines.point(count - 2), &tol) {
                count -= 1;
            }
        }
        self.finish(view, count, &tol);
        self.session.ended(view);
        true
    }

    /// Removes the last placed vertex, keeping the rubber-band point.
    fn back_step(&mut self, view: &mut dyn CommandView) -> bool {
        let step = self.session.step();
        if step <= 1 {
            return false;
        }
        if let Some(lines) = self.lines_mut() {
            lines.remove_point(step - 1);
        }
        self.session.set_step(step - 1);
        view.redraw();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::MockView;
    use kurbo::Point;

    const A: Point = Point::new(0.0, 0.0);
    const B: Point = Point::new(10.0, 0.0);
    const C: Point = Point::new(10.0, 10.0);

    fn start(view: &mut MockView, mut cmd: DrawLines) -> DrawLines {
        cmd.initialize(view, None).unwrap();
        cmd.touch_began(view, &Motion::at(A));
        cmd.touch_moved(view, &Motion::drag(A, B));
        cmd.touch_ended(view, &Motion::at(B));
        assert_eq!(cmd.step(), 2);
        cmd
    }

    fn committed_lines(view: &MockView) -> Lines {
        let (_, shape) = view.shapes.shapes_ordered().last().unwrap();
        shape.as_any().downcast_ref::<Lines>().unwrap().clone()
    }

    #[test]
    fn test_rubber_point_follows_drag() {
        let mut view = MockView::new();
        let mut cmd = start(&mut view, DrawLines::new());
        assert_eq!(cmd.gather().unwrap().points(), vec![A, B, B]);
        cmd.touch_began(&mut view, &Motion::at(Point::new(5.0, 5.0)));
        cmd.touch_moved(&mut view, &Motion::drag(Point::new(5.0, 5.0), C));
        assert_eq!(cmd.gather().unwrap().points(), vec![A, B, C]);
    }

    #[test]
    fn test_polygon_closes_on_first_vertex() {
        let mut view = MockView::new();
        let mut cmd = start(&mut view, DrawLines::polygon());
        assert!(cmd.click(&mut view, &Motion::at(C)));
        assert_eq!(cmd.step(), 3);
        // Within the 0.2 step tolerance of the first vertex.
        cmd.click(&mut view, &Motion::at(Point::new(0.05, 0.05)));

        assert_eq!(cmd.step(), 0);
        let poly = committed_lines(&view);
        assert!(poly.is_closed());
        assert_eq!(poly.points(), vec![A, B, C]);
        assert!(view.new_shape_id.is_some());
    }

    #[test]
    fn test_polyline_does_not_close_on_first_vertex() {
        let mut view = MockView::new();
        let mut cmd = start(&mut view, DrawLines::new());
        cmd.click(&mut view, &Motion::at(C));
        cmd.click(&mut view, &Motion::at(A));
        assert_eq!(cmd.step(), 4);
        assert!(view.shapes.is_empty());
    }

    #[test]
    fn test_double_click_finishes_polyline() {
        let mut view = MockView::new();
        let mut cmd = start(&mut view, DrawLines::new());
        cmd.click(&mut view, &Motion::at(C));
        assert!(cmd.double_click(&mut view, &Motion::at(C)));
        assert_eq!(cmd.step(), 0);
        let lines = committed_lines(&view);
        assert!(!lines.is_closed());
        assert_eq!(lines.points(), vec![A, B, C]);
    }

    #[test]
    fn test_double_click_with_too_few_polygon_vertices() {
        let mut view = MockView::new();
        let mut cmd = start(&mut view, DrawLines::polygon());
        assert!(cmd.double_click(&mut view, &Motion::at(B)));
        assert_eq!(cmd.step(), 0);
        assert!(view.shapes.is_empty());
        assert!(!cmd.double_click(&mut view, &Motion::at(B)));
    }

    #[test]
    fn test_max_vertices_commits_automatically() {
        let mut view = MockView::new();
        let mut cmd = DrawLines::new();
        cmd.max_vertices = Some(3);
        let mut cmd = start(&mut view, cmd);
        cmd.click(&mut view, &Motion::at(C));
        assert_eq!(cmd.step(), 0);
        assert_eq!(committed_lines(&view).points(), vec![A, B, C]);
    }

    #[test]
    fn test_back_step_removes_last_vertex() {
        let mut view = MockView::new();
        let mut cmd = start(&mut view, DrawLines::new());
        cmd.click(&mut view, &Motion::at(C));
        assert_eq!(cmd.gather().unwrap().points(), vec![A, B, C, C]);
        assert!(cmd.back_step(&mut view));
        assert_eq!(cmd.step(), 2);
        assert_eq!(cmd.gather().unwrap().points(), vec![A, B, C]);
        assert!(cmd.back_step(&mut view));
        assert!(!cmd.back_step(&mut view));
        assert_eq!(cmd.gather().unwrap().points(), vec![A, C]);
    }

    #[test]
    fn test_reinitialize_resets_pending_vertices() {
        let mut view = MockView::new();
        let mut cmd = start(&mut view, DrawLines::new());
        cmd.initialize(&mut view, None).unwrap();
        assert_eq!(cmd.step(), 0);
        assert_eq!(cmd.session().shape().unwrap().point_count(), 0);
    }
}
