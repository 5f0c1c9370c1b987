//! Recording host view for command tests.

use crate::container::{ShapeContainer, ShapeList};
use crate::factory::{BasicShapeFactory, ShapeFactory};
use crate::shapes::{Shape, ShapeId};
use crate::snap::{SnapEngine, SnapProvider};
use crate::style::ShapeStyle;
use crate::view::{CommandView, DrawConfig};

/// Model units per display millimetre.
pub const MM_TO_MODEL: f64 = 0.1;

pub struct MockView {
    pub shapes: ShapeList,
    pub factory: BasicShapeFactory,
    pub snap: SnapEngine,
    pub style: ShapeStyle,
    pub config: DrawConfig,
    pub messages: Vec<String>,
    pub new_shape_id: Option<ShapeId>,
    pub added: Vec<ShapeId>,
    pub redraws: usize,
    pub selecting: bool,
    pub veto: bool,
    pub finger: bool,
    pub in_drawing_calls: usize,
    pub in_drawing_result: bool,
}

impl MockView {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            shapes: ShapeList::new(),
            factory: BasicShapeFactory::new(),
            snap: SnapEngine::default(),
            style: ShapeStyle::default(),
            config: DrawConfig::default(),
            messages: Vec::new(),
            new_shape_id: None,
            added: Vec::new(),
            redraws: 0,
            selecting: false,
            veto: false,
            finger: true,
            in_drawing_calls: 0,
            in_drawing_result: false,
        }
    }

    /// Committed shapes, back to front.
    pub fn committed(&self) -> Vec<Vec<kurbo::Point>> {
        self.shapes.shapes_ordered().map(|(_, s)| s.points()).collect()
    }
}

impl CommandView for MockView {
    fn display_mm_to_model(&self, mm: f64) -> f64 {
        mm * MM_TO_MODEL
    }

    fn style(&self) -> ShapeStyle {
        self.style.clone()
    }

    fn factory(&self) -> &dyn ShapeFactory {
        &self.factory
    }

    fn shapes(&self) -> &dyn ShapeContainer {
        &self.shapes
    }

    fn shapes_mut(&mut self) -> &mut dyn ShapeContainer {
        &mut self.shapes
    }

    fn snap(&mut self) -> &mut dyn SnapProvider {
        &mut self.snap
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn config(&self) -> DrawConfig {
        self.config
    }

    fn shape_will_add(&mut self, _shape: &dyn Shape) -> bool {
        !self.veto
    }

    fn shape_added(&mut self, id: ShapeId) {
        self.added.push(id);
    }

    fn set_new_shape_id(&mut self, id: Option<ShapeId>) {
        self.new_shape_id = id;
    }

    fn to_select_command(&mut self) {
        self.selecting = true;
    }

    fn use_finger(&self) -> bool {
        self.finger
    }

    fn show_in_drawing(&mut self, _shape: Option<&dyn Shape>) -> bool {
        self.in_drawing_calls += 1;
        self.in_drawing_result
    }
}
