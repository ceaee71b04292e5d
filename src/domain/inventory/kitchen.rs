use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A stored ingredient; `amount` is a display string such as `"2 kg"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub amount: String,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

/// The user's kitchen stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenInventory {
    #[serde(default)]
    pub ingredients: Vec<InventoryItem>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_updated: DateTime<Utc>,
}

impl Default for KitchenInventory {
    fn default() -> Self {
        Self {
            ingredients: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

/// An item named in a user request ("add 2 kg of tomatoes")
///
/// Models frequently emit bare numbers for `amount`, so numbers are
/// accepted and kept as their text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedItem {
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: String,
}

impl RequestedItem {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("invalid amount: {}", other))),
    }
}
