//! Core data models for the Tiki product listing
//!
//! This module contains the product schema shared by the console fetcher and
//! the served endpoint, plus the case-insensitive JSON decoding the upstream
//! API requires.

pub mod tiki;

pub use tiki::{ProductQuery, TikiClient, TikiError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single product from the listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Product identifier, unique within one response
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    /// Stock keeping unit
    #[serde(deserialize_with = "null_as_default")]
    pub sku: String,
    /// Display name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// List price before discount
    #[serde(deserialize_with = "null_as_default")]
    pub original_price: i64,
    /// Current selling price
    #[serde(deserialize_with = "null_as_default")]
    pub price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub brand_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub seller_name: String,
    /// Promotional badges, in upstream order
    #[serde(rename = "badges_new", deserialize_with = "null_as_default")]
    pub badges: Vec<Badge>,
}

/// A promotional badge attached to a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Badge {
    #[serde(deserialize_with = "null_as_default")]
    pub placement: String,
    /// Badge type as reported upstream (`type` on the wire)
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// Text color, when the badge specifies one
    pub text_color: Option<String>,
}

/// Top-level upstream payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<Product>,
}

impl ApiResponse {
    /// A response carrying no products
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decodes an upstream body, matching field names case-insensitively.
    ///
    /// A literal `null` body decodes to an empty response.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        if value.is_null() {
            return Ok(Self::empty());
        }
        from_value_case_insensitive(value)
    }
}

/// Deserializes `value` after lowercasing every object key.
///
/// All wire names in this module are lowercase, so `"ID"`, `"Name"` and
/// `"BADGES_NEW"` resolve to the same fields as their lowercase spelling.
pub fn from_value_case_insensitive<T: DeserializeOwned>(
    value: Value,
) -> Result<T, serde_json::Error> {
    serde_json::from_value(lowercase_keys(value))
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Treats an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
