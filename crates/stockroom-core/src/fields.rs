//! # Field Maps
//!
//! The key/value payload of an insert or update request.
//!
//! ## Input Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a FieldMap Gets Built                            │
//! │                                                                         │
//! │  Typed builder        FieldMap::new().with_quantity(2)                 │
//! │  Form text            FieldMap::from_pairs([("product_price", "600")]) │
//! │  JSON                 FieldMap::from_json(r#"{"product_name":"TV"}"#)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Unknown key? ───────► ValidationError::UnknownField                   │
//! │  "_id"?       ───────► ValidationError::ReadOnly                       │
//! │  "6OO" price? ───────► ValidationError::InvalidFormat                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validation::validate_for_insert / validate_for_update                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `FieldMap` only says which keys were supplied. Emptiness and sign
//! checks live in [`crate::validation`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::query::Column;
use crate::types::FieldValue;

/// Optional value per writable column. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct FieldMap {
    #[serde(rename = "product_name")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,

    #[serde(rename = "product_price")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price: Option<i64>,

    #[serde(rename = "product_quantity")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub quantity: Option<i64>,

    #[serde(rename = "product_supplier")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub supplier_name: Option<String>,

    #[serde(rename = "product_supplier_number")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub supplier_phone: Option<String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_supplier_name(mut self, supplier: impl Into<String>) -> Self {
        self.supplier_name = Some(supplier.into());
        self
    }

    pub fn with_supplier_phone(mut self, phone: impl Into<String>) -> Self {
        self.supplier_phone = Some(phone.into());
        self
    }

    /// Builds a map from string pairs, the way form input arrives.
    ///
    /// Integer columns are trimmed and parsed. Later duplicates win.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::FieldMap;
    ///
    /// let fields = FieldMap::from_pairs([
    ///     ("product_name", "Apple"),
    ///     ("product_price", " 900 "),
    /// ]).unwrap();
    /// assert_eq!(fields.price, Some(900));
    ///
    /// assert!(FieldMap::from_pairs([("_id", "3")]).is_err());
    /// ```
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ValidationError> {
        let mut map = FieldMap::new();
        for (key, raw) in pairs {
            let column = parse_writable_key(key)?;
            let value = if column.is_integer() {
                FieldValue::Integer(parse_integer(column, raw)?)
            } else {
                FieldValue::Text(raw.to_string())
            };
            map.set(column, value)?;
        }
        Ok(map)
    }

    /// Parses a JSON object keyed by column keys.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| ValidationError::InvalidFormat {
                field: "field map".to_string(),
                reason: e.to_string(),
            })?;

        let mut map = FieldMap::new();
        for (key, value) in object {
            let column = parse_writable_key(&key)?;
            let value = match (column.is_integer(), value) {
                (true, serde_json::Value::Number(n)) => {
                    FieldValue::Integer(n.as_i64().ok_or_else(|| {
                        ValidationError::InvalidFormat {
                            field: key.clone(),
                            reason: format!("{} is not an integer", n),
                        }
                    })?)
                }
                (true, serde_json::Value::String(s)) => {
                    FieldValue::Integer(parse_integer(column, &s)?)
                }
                (false, serde_json::Value::String(s)) => FieldValue::Text(s),
                (_, other) => {
                    return Err(ValidationError::InvalidFormat {
                        field: key.clone(),
                        reason: format!("unexpected value {}", other),
                    })
                }
            };
            map.set(column, value)?;
        }
        Ok(map)
    }

    /// Stores a value under a column, checking the value kind.
    pub fn set(&mut self, column: Column, value: FieldValue) -> Result<(), ValidationError> {
        let wrong_kind = || ValidationError::InvalidFormat {
            field: column.as_str().to_string(),
            reason: if column.is_integer() {
                "expected an integer".to_string()
            } else {
                "expected text".to_string()
            },
        };

        match (column, value) {
            (Column::Id, _) => {
                return Err(ValidationError::ReadOnly {
                    field: column.as_str().to_string(),
                })
            }
            (Column::Name, FieldValue::Text(v)) => self.name = Some(v),
            (Column::Price, FieldValue::Integer(v)) => self.price = Some(v),
            (Column::Quantity, FieldValue::Integer(v)) => self.quantity = Some(v),
            (Column::SupplierName, FieldValue::Text(v)) => self.supplier_name = Some(v),
            (Column::SupplierPhone, FieldValue::Text(v)) => self.supplier_phone = Some(v),
            _ => return Err(wrong_kind()),
        }
        Ok(())
    }

    /// Returns the supplied value for a column.
    pub fn get(&self, column: Column) -> Option<FieldValue> {
        match column {
            Column::Id => None,
            Column::Name => self.name.clone().map(FieldValue::Text),
            Column::Price => self.price.map(FieldValue::Integer),
            Column::Quantity => self.quantity.map(FieldValue::Integer),
            Column::SupplierName => self.supplier_name.clone().map(FieldValue::Text),
            Column::SupplierPhone => self.supplier_phone.clone().map(FieldValue::Text),
        }
    }

    /// Supplied columns in validation order.
    pub fn keys(&self) -> Vec<Column> {
        Column::DATA
            .into_iter()
            .filter(|column| self.get(*column).is_some())
            .collect()
    }

    /// Supplied (column, value) pairs in validation order.
    pub fn entries(&self) -> Vec<(Column, FieldValue)> {
        Column::DATA
            .into_iter()
            .filter_map(|column| self.get(column).map(|value| (column, value)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_writable_key(key: &str) -> Result<Column, ValidationError> {
    let column: Column = key.parse()?;
    if column == Column::Id {
        return Err(ValidationError::ReadOnly {
            field: key.to_string(),
        });
    }
    Ok(column)
}

/// Blank integer input is left to validation as a missing value, so it
/// reports `Required` rather than a format error.
fn parse_integer(column: Column, raw: &str) -> Result<i64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(column.as_str()));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: column.as_str().to_string(),
            reason: format!("'{}' is not an integer", trimmed),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
