use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static ATTRIBUTE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ENTRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Identifier wrapper for attribute definitions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(pub String);

impl AttributeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        let id = ATTRIBUTE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("attr-{id:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for scored entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        let id = ENTRY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("entry-{id:06}"))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Data type of an attribute. Every variant has a matching [`AttributeValue`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Integer,
    Decimal,
    String,
    Enum,
}

impl AttributeType {
    pub const fn label(self) -> &'static str {
        match self {
            AttributeType::Integer => "integer",
            AttributeType::Decimal => "decimal",
            AttributeType::String => "string",
            AttributeType::Enum => "enum",
        }
    }
}

/// A value stored against an attribute. Variants never coerce into one another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Integer(i64),
    Decimal(f64),
    String(String),
    Enum(String),
}

impl AttributeValue {
    pub const fn value_type(&self) -> AttributeType {
        match self {
            AttributeValue::Integer(_) => AttributeType::Integer,
            AttributeValue::Decimal(_) => AttributeType::Decimal,
            AttributeValue::String(_) => AttributeType::String,
            AttributeValue::Enum(_) => AttributeType::Enum,
        }
    }

    /// Numeric view used by comparisons; `None` for string and enum values.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(value) => Some(*value as f64),
            AttributeValue::Decimal(value) => Some(*value),
            AttributeValue::String(_) | AttributeValue::Enum(_) => None,
        }
    }

    /// Text view used by exact-match conditions; `None` for numeric values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::String(value) | AttributeValue::Enum(value) => Some(value),
            AttributeValue::Integer(_) | AttributeValue::Decimal(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(value) => write!(f, "{value}"),
            AttributeValue::Decimal(value) => write!(f, "{value}"),
            AttributeValue::String(value) | AttributeValue::Enum(value) => f.write_str(value),
        }
    }
}

/// Describes a scorable field that entries can carry values for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: AttributeId,
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl AttributeDefinition {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        attribute_type: AttributeType,
    ) -> Self {
        Self {
            id: AttributeId::generate(),
            name: name.into(),
            display_name: display_name.into(),
            attribute_type,
            category: None,
            order: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }
}

/// A record of real-world data evaluated against rules.
///
/// An attribute missing from `values` means the value was not provided.
/// `evaluated_score` is written by callers after evaluation; engines never touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub values: BTreeMap<AttributeId, AttributeValue>,
    #[serde(default)]
    pub evaluated_score: i64,
}

impl Entry {
    pub fn new(values: BTreeMap<AttributeId, AttributeValue>) -> Self {
        Self {
            id: EntryId::generate(),
            values,
            evaluated_score: 0,
        }
    }

    pub fn with_value(mut self, attribute: &AttributeId, value: AttributeValue) -> Self {
        self.values.insert(attribute.clone(), value);
        self
    }

    pub fn value(&self, attribute: &AttributeId) -> Option<&AttributeValue> {
        self.values.get(attribute)
    }
}
