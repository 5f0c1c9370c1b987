//! VgDraw Core Library
//!
//! Geometry kernel, shape model and interactive drawing commands for a
//! touch-driven vector editor. Rendering and the host window live outside
//! this crate; commands talk to the host through [`CommandView`].

pub mod command;
pub mod container;
pub mod factory;
pub mod geom;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod style;
pub mod view;

pub use command::{Command, CommandError, DrawDot, DrawLine, DrawLines, DrawRect, DrawSession, command_by_name};
pub use container::{ShapeContainer, ShapeList};
pub use factory::{BasicShapeFactory, ShapeFactory, load_shape};
pub use geom::Tolerance;
pub use shapes::{Dot, HitResult, Line, LineMode, Lines, RectShape, Shape, ShapeFlags, ShapeId};
pub use snap::{SnapEngine, SnapMode, SnapProvider, SnapResult, SnapTarget, SnapTargetKind, GRID_SIZE};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use style::{SerializableColor, ShapeStyle, StrokeStyle};
pub use view::{CommandView, DrawConfig, Motion};
