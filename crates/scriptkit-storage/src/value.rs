//! Value shapes accepted by the key-value store.

use crate::Image;
use serde_json::Value;

/// A value held by a [`crate::KeyValueStore`].
///
/// `Binary` and `Image` values are written as files; every value also gets a
/// secure-store entry holding its JSON form.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Json(Value),
    Binary(Vec<u8>),
    Image(Image),
}

impl StoredValue {
    /// JSON form written to the secure store.
    ///
    /// File-backed shapes have no JSON representation of their content and
    /// serialize as an empty object, so reading one back from the secure store
    /// alone yields `{}`.
    pub fn to_json(&self) -> Value {
        match self {
            StoredValue::Json(value) => value.clone(),
            StoredValue::Binary(_) | StoredValue::Image(_) => Value::Object(Default::default()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            StoredValue::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            StoredValue::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn into_image(self) -> Option<Image> {
        match self {
            StoredValue::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, StoredValue::Image(_))
    }
}

impl From<Value> for StoredValue {
    fn from(value: Value) -> Self {
        StoredValue::Json(value)
    }
}

impl From<Vec<u8>> for StoredValue {
    fn from(bytes: Vec<u8>) -> Self {
        StoredValue::Binary(bytes)
    }
}

impl From<Image> for StoredValue {
    fn from(image: Image) -> Self {
        StoredValue::Image(image)
    }
}
