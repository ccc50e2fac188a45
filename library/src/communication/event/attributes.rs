use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value of a single message attribute
///
/// Attributes carry routing metadata alongside a message without touching its
/// payload. Subscribers may use them to filter deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Plain string value
    String(String),
    /// Numeric value
    Number(f64),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Set of named attributes attached to a published message
pub type AttributeMap = HashMap<String, AttributeValue>;
