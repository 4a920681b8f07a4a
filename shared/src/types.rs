//! Reference snapshots and other common types used across the platform

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A selectable (identifier, display name) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    pub id: Uuid,
    pub name: String,
}

impl Choice {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Suppliers available for selection, read once at the start of a request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierSnapshot {
    choices: Vec<Choice>,
}

impl SupplierSnapshot {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self { choices }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.choices.iter().any(|c| c.id == id)
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }
}

/// Current stock level of one product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductStock {
    pub id: Uuid,
    pub name: String,
    pub stock_quantity: i64,
}

/// Products and their stock levels, read once at the start of a request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductSnapshot {
    products: Vec<ProductStock>,
}

impl ProductSnapshot {
    pub fn new(products: Vec<ProductStock>) -> Self {
        Self { products }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    pub fn stock_of(&self, id: Uuid) -> Option<i64> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.stock_quantity)
    }

    pub fn choices(&self) -> Vec<Choice> {
        self.products
            .iter()
            .map(|p| Choice::new(p.id, p.name.clone()))
            .collect()
    }
}

/// Deserialize a form field into its raw text
///
/// Clients may post numbers or `null` for fields that a browser form would send
/// as text; all of them are accepted and kept as the text a form would carry.
pub fn form_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}
