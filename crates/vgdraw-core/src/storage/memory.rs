//! In-memory storage implementation.

use super::{Storage, StorageResult};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single typed value held by [`MemoryStorage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StorageValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Points(Vec<Point>),
}

/// In-memory storage for testing and ephemeral use.
///
/// Keys are kept sorted so the JSON export is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStorage {
    values: BTreeMap<String, StorageValue>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&StorageValue> {
        self.values.get(key)
    }

    /// Remove all keys.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Export to a JSON string.
    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Import from a JSON string produced by [`MemoryStorage::to_json`].
    pub fn from_json(json: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn insert(&mut self, key: &str, value: StorageValue) {
        self.values.insert(key.to_string(), value);
    }
}

impl Storage for MemoryStorage {
    fn read_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(StorageValue::Int(v)) => *v,
            _ => default,
        }
    }

    fn read_float(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key) {
            Some(StorageValue::Float(v)) => *v,
            Some(StorageValue::Int(v)) => *v as f64,
            _ => default,
        }
    }

    fn read_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(StorageValue::Bool(v)) => *v,
            _ => default,
        }
    }

    fn read_string(&self, key: &str) -> Option<String> {
        match self.values.get(key) {
            Some(StorageValue::Text(v)) => Some(v.clone()),
            _ => None,
        }
    }

    fn read_points(&self, key: &str) -> Option<Vec<Point>> {
        match self.values.get(key) {
            Some(StorageValue::Points(v)) => Some(v.clone()),
            _ => None,
        }
    }

    fn write_int(&mut self, key: &str, value: i64) {
        self.insert(key, StorageValue::Int(value));
    }

    fn write_float(&mut self, key: &str, value: f64) {
        self.insert(key, StorageValue::Float(value));
    }

    fn write_bool(&mut self, key: &str, value: bool) {
        self.insert(key, StorageValue::Bool(value));
    }

    fn write_string(&mut self, key: &str, value: &str) {
        self.insert(key, StorageValue::Text(value.to_string()));
    }

    fn write_points(&mut self, key: &str, points: &[Point]) {
        self.insert(key, StorageValue::Points(points.to_vec()));
    }
}
