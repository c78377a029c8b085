//! # Domain Types
//!
//! The single entity Stockroom persists: a product row.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   NewProduct    │   │     Product     │   │   ProductId     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  validated      │──►│  id (assigned)  │   │  positive i64   │       │
//! │  │  insert payload │   │  + 5 fields     │   │  never reused   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   StockStatus   │   │   PriceLabel    │   display sentinels         │
//! │  │  InStock(n)     │   │  Known(n)       │   (0 = out of stock,        │
//! │  │  OutOfStock     │   │  Unknown        │    0 = price unknown)       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serialized field names are the stable column keys (`product_name`, ...),
//! so a `Product` rendered to JSON reads the same as a field map.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::query::Column;

// =============================================================================
// Product Id
// =============================================================================

/// Row identifier assigned by the store on insert.
///
/// Always positive. Ids are handed out once and never reused, even after
/// the row (or the whole table) is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(i64);

impl ProductId {
    /// Wraps a raw id, rejecting zero and negatives.
    pub const fn new(raw: i64) -> Option<Self> {
        if raw > 0 {
            Some(ProductId(raw))
        } else {
            None
        }
    }

    /// Returns the raw integer value.
    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A persisted product row. All five data fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Row id (`_id`).
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "_id"))]
    pub id: ProductId,

    /// Display name.
    #[serde(rename = "product_name")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "product_name"))]
    pub name: String,

    /// Price in the smallest currency unit. `0` means "unknown".
    #[serde(rename = "product_price")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "product_price"))]
    pub price: i64,

    /// Units on hand. `0` means "out of stock".
    #[serde(rename = "product_quantity")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "product_quantity"))]
    pub quantity: i64,

    /// Supplier display name.
    #[serde(rename = "product_supplier")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "product_supplier"))]
    pub supplier_name: String,

    /// Supplier phone number, free-form.
    #[serde(rename = "product_supplier_number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "product_supplier_number"))]
    pub supplier_phone: String,
}

impl Product {
    /// Attaches a freshly assigned id to a validated payload.
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Product {
            id,
            name: new.name,
            price: new.price,
            quantity: new.quantity,
            supplier_name: new.supplier_name,
            supplier_phone: new.supplier_phone,
        }
    }

    /// Stock display state for the quantity column.
    #[inline]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::of(self.quantity)
    }

    /// Price display state for the price column.
    #[inline]
    pub fn price_label(&self) -> PriceLabel {
        PriceLabel::of(self.price)
    }

    /// Returns the value of a data column as a field value.
    pub fn value_of(&self, column: Column) -> FieldValue {
        match column {
            Column::Id => FieldValue::Integer(self.id.get()),
            Column::Name => FieldValue::Text(self.name.clone()),
            Column::Price => FieldValue::Integer(self.price),
            Column::Quantity => FieldValue::Integer(self.quantity),
            Column::SupplierName => FieldValue::Text(self.supplier_name.clone()),
            Column::SupplierPhone => FieldValue::Text(self.supplier_phone.clone()),
        }
    }
}

// =============================================================================
// New Product
// =============================================================================

/// A fully validated insert payload (no id yet).
///
/// Only [`crate::validation::validate_for_insert`] builds one, so holding a
/// `NewProduct` means every required field passed its check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    #[serde(rename = "product_name")]
    pub name: String,
    #[serde(rename = "product_price")]
    pub price: i64,
    #[serde(rename = "product_quantity")]
    pub quantity: i64,
    #[serde(rename = "product_supplier")]
    pub supplier_name: String,
    #[serde(rename = "product_supplier_number")]
    pub supplier_phone: String,
}

// =============================================================================
// Field Value
// =============================================================================

/// A single cell value: the store only has text and integer columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            FieldValue::Integer(_) => None,
        }
    }
}

// =============================================================================
// Display Sentinels
// =============================================================================

/// How the quantity column is shown in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockStatus {
    InStock(i64),
    OutOfStock,
}

impl StockStatus {
    pub fn of(quantity: i64) -> Self {
        if quantity > 0 {
            StockStatus::InStock(quantity)
        } else {
            StockStatus::OutOfStock
        }
    }
}

/// How the price column is shown in the list. Zero is not rejected on
/// write, it is only rendered as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PriceLabel {
    Known(i64),
    Unknown,
}

impl PriceLabel {
    pub fn of(price: i64) -> Self {
        if price == 0 {
            PriceLabel::Unknown
        } else {
            PriceLabel::Known(price)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn television() -> Product {
        Product {
            id: ProductId::new(7).unwrap(),
            name: "Television".to_string(),
            price: 600,
            quantity: 5,
            supplier_name: "Samsung".to_string(),
            supplier_phone: "18007267864".to_string(),
        }
    }

    #[test]
    fn test_product_id_rejects_non_positive() {
        assert!(ProductId::new(0).is_none());
        assert!(ProductId::new(-3).is_none());
        assert_eq!(ProductId::new(42).map(|id| id.get()), Some(42));
    }

    #[test]
    fn test_display_sentinels() {
        assert_eq!(StockStatus::of(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::of(3), StockStatus::InStock(3));
        assert_eq!(PriceLabel::of(0), PriceLabel::Unknown);
        assert_eq!(PriceLabel::of(600), PriceLabel::Known(600));

        let mut product = television();
        product.quantity = 0;
        assert_eq!(product.stock_status(), StockStatus::OutOfStock);
        assert_eq!(product.price_label(), PriceLabel::Known(600));
    }

    #[test]
    fn test_product_serializes_with_column_keys() {
        let json = serde_json::to_value(television()).unwrap();
        assert_eq!(json["_id"], 7);
        assert_eq!(json["product_name"], "Television");
        assert_eq!(json["product_supplier_number"], "18007267864");
    }

    #[test]
    fn test_value_of() {
        let product = television();
        assert_eq!(product.value_of(Column::Quantity), FieldValue::Integer(5));
        assert_eq!(
            product.value_of(Column::SupplierName).as_text(),
            Some("Samsung")
        );
    }
}
