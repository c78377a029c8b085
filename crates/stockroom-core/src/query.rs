//! # Query Shapes
//!
//! Columns, projections and filters understood by the product store.
//!
//! These are plain data: rendering them into SQL (with bound parameters)
//! is the database layer's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Name of the single product table (and the collection path segment).
pub const TABLE_NAME: &str = "inventory";

// =============================================================================
// Column
// =============================================================================

/// A column of the `inventory` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Column {
    #[serde(rename = "_id")]
    Id,
    #[serde(rename = "product_name")]
    Name,
    #[serde(rename = "product_price")]
    Price,
    #[serde(rename = "product_quantity")]
    Quantity,
    #[serde(rename = "product_supplier")]
    SupplierName,
    #[serde(rename = "product_supplier_number")]
    SupplierPhone,
}

impl Column {
    /// Every column, id first, in table order.
    pub const ALL: [Column; 6] = [
        Column::Id,
        Column::Name,
        Column::Price,
        Column::Quantity,
        Column::SupplierName,
        Column::SupplierPhone,
    ];

    /// Writable columns in validation order.
    pub const DATA: [Column; 5] = [
        Column::Name,
        Column::Price,
        Column::Quantity,
        Column::SupplierName,
        Column::SupplierPhone,
    ];

    /// The stable, case-sensitive column key.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "_id",
            Column::Name => "product_name",
            Column::Price => "product_price",
            Column::Quantity => "product_quantity",
            Column::SupplierName => "product_supplier",
            Column::SupplierPhone => "product_supplier_number",
        }
    }

    /// Integer columns; the rest hold text.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Column::Id | Column::Price | Column::Quantity)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownField {
                field: s.to_string(),
            })
    }
}

// =============================================================================
// Projection
// =============================================================================

/// Which columns a query returns. `_id` is always included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Projection {
    columns: Vec<Column>,
}

impl Projection {
    /// Every column.
    pub fn all() -> Self {
        Projection {
            columns: Column::ALL.to_vec(),
        }
    }

    /// The given columns, de-duplicated, with `_id` prepended if missing.
    pub fn of(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut out = vec![Column::Id];
        for column in columns {
            if !out.contains(&column) {
                out.push(column);
            }
        }
        Projection { columns: out }
    }

    /// Builds a projection from column keys, e.g. a list the UI asked for.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Result<Self, ValidationError> {
        let columns = keys
            .into_iter()
            .map(Column::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Projection::of(columns))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn contains(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// True when every data column is selected.
    pub fn is_complete(&self) -> bool {
        Column::DATA.iter().all(|c| self.contains(*c))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::all()
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Row filter for collection-level queries and deletes.
///
/// All set conditions are AND-combined. An empty filter matches every row.
///
/// ## Example
/// ```rust
/// use stockroom_core::query::ProductFilter;
///
/// let filter = ProductFilter::new().supplier("Samsung").in_stock();
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductFilter {
    /// Case-insensitive substring of `product_name`.
    #[serde(default)]
    pub name_contains: Option<String>,
    /// Exact `product_supplier`.
    #[serde(default)]
    pub supplier: Option<String>,
    /// `Some(true)`: quantity > 0, `Some(false)`: quantity = 0.
    #[serde(default)]
    pub in_stock: Option<bool>,
    /// quantity >= n.
    #[serde(default)]
    pub min_quantity: Option<i64>,
    /// price <= n.
    #[serde(default)]
    pub max_price: Option<i64>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn in_stock(mut self) -> Self {
        self.in_stock = Some(true);
        self
    }

    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = Some(false);
        self
    }

    pub fn min_quantity(mut self, min: i64) -> Self {
        self.min_quantity = Some(min);
        self
    }

    pub fn max_price(mut self, max: i64) -> Self {
        self.max_price = Some(max);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name_contains.is_none()
            && self.supplier.is_none()
            && self.in_stock.is_none()
            && self.min_quantity.is_none()
            && self.max_price.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_keys_round_trip() {
        for column in Column::ALL {
            assert_eq!(column.as_str().parse::<Column>().unwrap(), column);
        }
        assert!("product_colour".parse::<Column>().is_err());
        assert!("PRODUCT_NAME".parse::<Column>().is_err());
    }

    #[test]
    fn test_projection_always_has_id() {
        let projection = Projection::of([Column::Name, Column::Quantity, Column::Name]);
        assert_eq!(
            projection.columns(),
            &[Column::Id, Column::Name, Column::Quantity]
        );
        assert!(!projection.is_complete());
        assert!(Projection::all().is_complete());
    }

    #[test]
    fn test_projection_from_keys() {
        let projection = Projection::from_keys(["product_price", "_id"]).unwrap();
        assert_eq!(projection.columns(), &[Column::Id, Column::Price]);

        let err = Projection::from_keys(["price"]).unwrap_err();
        assert_eq!(err.field(), "price");
    }

    #[test]
    fn test_filter_builder() {
        assert!(ProductFilter::new().is_empty());
        let filter = ProductFilter::new().name_contains("tv").max_price(700);
        assert_eq!(filter.name_contains.as_deref(), Some("tv"));
        assert_eq!(filter.max_price, Some(700));
        assert!(!filter.is_empty());
    }
}
