//! Dynamic attribute values and their coercion policy.
//!
//! Attributes are stored as text and tagged with a [`FieldType`]; parsing is
//! the reader's responsibility. The coercion rules are deliberate:
//! - `number` parses as `f64`; malformed text is a typed
//!   [`AttributeParseError`], never a silent zero
//! - `boolean` is a literal comparison against the string `"true"`
//! - `json` values that fail to parse coerce to an empty collection instead
//!   of raising (documented soft behavior)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The declared type of a dynamic attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    Json,
}

impl FieldType {
    /// The tag persisted in the `field_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Json => "json",
        }
    }

    /// Parses a stored tag. Unknown tags fall back to `Text`, which keeps
    /// old rows readable if a tag is ever renamed.
    pub fn parse(s: &str) -> Self {
        match s {
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// A value stored with an unexpected shape for its declared type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("attribute {field:?}: value {value:?} is not a valid {expected}")]
pub struct AttributeParseError {
    pub field: String,
    pub value: String,
    pub expected: &'static str,
}

/// One named, typed scalar value attached to an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub field_name: String,
    pub field_value: String,
    pub field_type: FieldType,
    pub updated_at: i64,
}

/// All current attributes of one entity, keyed by field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeMap {
    fields: HashMap<String, Attribute>,
}

impl AttributeMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an attribute, keyed by its field name.
    pub fn insert(&mut self, attr: Attribute) {
        self.fields.insert(attr.field_name.clone(), attr);
    }

    /// Returns the raw attribute for a field, if present.
    pub fn get(&self, field: &str) -> Option<&Attribute> {
        self.fields.get(field)
    }

    /// Returns the raw stored text for a field.
    pub fn get_text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|a| a.field_value.as_str())
    }

    /// Parses a field as a number.
    ///
    /// `Ok(None)` when the field is absent; an error when the stored text is
    /// not a valid float.
    pub fn get_number(&self, field: &str) -> Result<Option<f64>, AttributeParseError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(attr) => attr
                .field_value
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| AttributeParseError {
                    field: field.to_string(),
                    value: attr.field_value.clone(),
                    expected: "number",
                }),
        }
    }

    /// Reads a field as a boolean: `Some(true)` only when the stored value
    /// is literally `"true"`.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).map(|a| a.field_value == "true")
    }

    /// Parses a field as epoch milliseconds (for `date`-typed fields).
    pub fn get_date_millis(&self, field: &str) -> Result<Option<i64>, AttributeParseError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(attr) => attr
                .field_value
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| AttributeParseError {
                    field: field.to_string(),
                    value: attr.field_value.clone(),
                    expected: "date (epoch milliseconds)",
                }),
        }
    }

    /// Parses a field as JSON. Absent fields yield `Null`; malformed values
    /// coerce to an empty object rather than raising.
    pub fn get_json(&self, field: &str) -> serde_json::Value {
        match self.fields.get(field) {
            None => serde_json::Value::Null,
            Some(attr) => serde_json::from_str(&attr.field_value)
                .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new())),
        }
    }

    /// Parses a field as a JSON array. Absent, malformed, or non-array
    /// values all coerce to an empty vector.
    pub fn get_array(&self, field: &str) -> Vec<serde_json::Value> {
        match self.get_json(field) {
            serde_json::Value::Array(items) => items,
            _ => Vec::new(),
        }
    }

    /// Number of attributes in the map.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the entity has no attributes (or does not exist).
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over (field name, attribute) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Attribute)> {
        self.fields.iter()
    }
}
