//! Control points exposed for shape editing.

use super::Shape;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What a handle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HandleType {
    /// A raw vertex.
    #[default]
    Vertex,
    /// The centre of the shape; moves it as a whole.
    Center,
    /// Midpoint of an edge.
    Midpoint,
    /// A point off the outline (e.g. a rotation grip).
    OutsidePoint,
}

/// Sub-mode chosen when a handle drag starts, carried between drag events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress; the next call picks a mode from the handle index.
    #[default]
    Idle,
    /// Dragging the vertex with this index.
    Vertex(usize),
    /// Dragging the edge starting at this vertex index.
    Edge(usize),
    /// Moving the whole shape by its centre.
    Center,
}

/// A handle with its position, as reported by a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Handle index within the shape.
    pub index: usize,
    /// What the handle controls.
    pub kind: HandleType,
    /// Position in model coordinates.
    pub position: Point,
    /// Whether the handle may not be moved.
    pub fixed: bool,
}

impl Handle {
    /// Read handle `index` of a shape.
    pub fn of(shape: &dyn Shape, index: usize) -> Self {
        Self {
            index,
            kind: shape.handle_type(index),
            position: shape.handle_point(index),
            fixed: shape.is_handle_fixed(index),
        }
    }
}

/// All handles of a shape.
pub fn handles(shape: &dyn Shape) -> Vec<Handle> {
    (0..shape.handle_count()).map(|i| Handle::of(shape, i)).collect()
}
