//! Storage abstraction for shape persistence.
//!
//! Shapes exchange their parameters through a typed key/value interface;
//! the persistence medium behind it is up to the host.

mod memory;

pub use memory::{MemoryStorage, StorageValue};

use kurbo::Point;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Missing key: {0}")]
    MissingKey(String),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("Unknown shape type: {0}")]
    UnknownShapeType(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Typed key/value store used by shape `save`/`load` and command initialization.
///
/// Readers take a default that is returned when the key is absent or holds
/// a value of another type.
pub trait Storage {
    fn read_int(&self, key: &str, default: i64) -> i64;
    fn read_float(&self, key: &str, default: f64) -> f64;
    fn read_bool(&self, key: &str, default: bool) -> bool;
    fn read_string(&self, key: &str) -> Option<String>;
    fn read_points(&self, key: &str) -> Option<Vec<Point>>;

    fn write_int(&mut self, key: &str, value: i64);
    fn write_float(&mut self, key: &str, value: f64);
    fn write_bool(&mut self, key: &str, value: bool);
    fn write_string(&mut self, key: &str, value: &str);
    fn write_points(&mut self, key: &str, points: &[Point]);
}
