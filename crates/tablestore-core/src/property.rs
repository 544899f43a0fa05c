//! Property types for table entities
//!
//! Stored entities keep their values in the shape they are persisted in:
//! Int64, Guid, Binary and DateTime properties all arrive here as strings,
//! and it is the query layer that decides how to compare them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A property value as stored on an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Null value
    Null,

    /// Boolean value
    Boolean(bool),

    /// Double precision number (Int32 and Double properties)
    Number(f64),

    /// UTF-8 string (String, Int64, Guid, Binary and DateTime properties)
    String(String),
}

impl PropertyValue {
    /// Try to get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Standard truthiness: null, false, zero, NaN and the empty string are false
    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Null => false,
            PropertyValue::Boolean(b) => *b,
            PropertyValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropertyValue::String(s) => !s.is_empty(),
        }
    }
}

// Convenience From implementations
impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Boolean(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Number(v as f64)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

/// The named properties of an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    inner: HashMap<String, PropertyValue>,
}

impl Properties {
    /// Create an empty property collection
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Set a property value
    pub fn set<K: Into<String>, V: Into<PropertyValue>>(&mut self, key: K, value: V) {
        self.inner.insert(key.into(), value.into());
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.inner.get(key)
    }

    /// Get the number of properties
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
