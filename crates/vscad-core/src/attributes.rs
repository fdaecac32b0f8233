//! Key-indexed attribute tables.
//!
//! The host document only understands geometry. Attribute tables travel with
//! a document and carry the source-of-truth scalars (name, uuid, dimensions)
//! so they survive a round trip. Entries are addressed by key, never by
//! position, so the set of attributes can grow without a migration.

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A stored attribute value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

/// A value with an optional unit label.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    pub value: AttributeValue,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub unit: Option<String>,
}

/// Anything that can describe itself as a set of attributes.
pub trait Attributed {
    /// Write every attribute the entity declares into `table`.
    fn write_attributes(&self, table: &mut AttributeTable);
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AttributeTable {
    entries: IndexMap<String, Attribute>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table holding all attributes of `entity`.
    pub fn from_entity(entity: &impl Attributed) -> Self {
        let mut table = Self::new();
        table.write(entity);
        table
    }

    /// Replace the table contents with the attributes of `entity`.
    pub fn write(&mut self, entity: &impl Attributed) {
        self.entries.clear();
        entity.write_attributes(self);
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(
            key.to_string(),
            Attribute {
                value: AttributeValue::Text(value.into()),
                unit: None,
            },
        );
    }

    pub fn set_number(&mut self, key: &str, value: f64, unit: Option<&str>) {
        self.entries.insert(
            key.to_string(),
            Attribute {
                value: AttributeValue::Number(value),
                unit: unit.map(str::to_string),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.entries.get(key)
    }

    /// Text value of `key`, `None` when absent or numeric.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)?.value {
            AttributeValue::Text(ref s) => Some(s.as_str()),
            AttributeValue::Number(_) => None,
        }
    }

    /// Numeric value of `key`, `None` when absent or textual.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)?.value {
            AttributeValue::Number(n) => Some(n),
            AttributeValue::Text(_) => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
