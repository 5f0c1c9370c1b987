//! Shape construction by type tag.

use crate::shapes::{Dot, KEY_TYPE, Line, Lines, RectShape, Shape};
use crate::storage::{Storage, StorageError, StorageResult};
use std::collections::HashMap;

/// Creates empty shapes from their type tag.
pub trait ShapeFactory {
    /// Create a shape of the given kind, or `None` if the kind is unknown.
    fn create_shape(&self, type_tag: &str) -> Option<Box<dyn Shape>>;
}

/// Constructor of an empty shape.
pub type ShapeCtor = fn() -> Box<dyn Shape>;

/// Factory over a table of constructors; starts with the built-in kinds.
#[derive(Debug, Clone)]
pub struct BasicShapeFactory {
    ctors: HashMap<String, ShapeCtor>,
}

impl Default for BasicShapeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicShapeFactory {
    /// Create a factory knowing the built-in kinds.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register(Dot::TYPE_TAG, || Box::new(Dot::default()));
        factory.register(Line::TYPE_TAG, || Box::new(Line::default()));
        factory.register(Lines::TYPE_TAG, || Box::new(Lines::default()));
        factory.register(RectShape::TYPE_TAG, || Box::new(RectShape::default()));
        factory
    }

    /// Create a factory with no kinds registered.
    pub fn empty() -> Self {
        Self { ctors: HashMap::new() }
    }

    /// Register (or replace) the constructor of a kind.
    pub fn register(&mut self, type_tag: &str, ctor: ShapeCtor) {
        self.ctors.insert(type_tag.to_string(), ctor);
    }
}

impl ShapeFactory for BasicShapeFactory {
    fn create_shape(&self, type_tag: &str) -> Option<Box<dyn Shape>> {
        self.ctors.get(type_tag).map(|ctor| ctor())
    }
}

/// Rebuild a saved shape, creating it through `factory` from the stored type tag.
pub fn load_shape(factory: &dyn ShapeFactory, storage: &dyn Storage) -> StorageResult<Box<dyn Shape>> {
    let tag = storage
        .read_string(KEY_TYPE)
        .ok_or_else(|| StorageError::MissingKey(KEY_TYPE.to_string()))?;
    let mut shape = factory.create_shape(&tag).ok_or_else(|| {
        log::warn!("Cannot load shape of unknown type {tag}");
        StorageError::UnknownShapeType(tag.clone())
    })?;
    shape.load(storage)?;
    Ok(shape)
}
