//! # Validation Module
//!
//! Field rules applied before any write reaches storage.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checks Run In This Order                           │
//! │                                                                         │
//! │  1. product_name             non-blank text                            │
//! │  2. product_price            integer >= 0                              │
//! │  3. product_quantity         integer >= 0                              │
//! │  4. product_supplier         non-blank text                            │
//! │  5. product_supplier_number  non-blank text (format not checked)       │
//! │                                                                         │
//! │  The first failure wins; later fields are not looked at.               │
//! │                                                                         │
//! │  Insert: every field must be present.                                  │
//! │  Update: only the fields present are checked.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::FieldMap;
//! use stockroom_core::validation::validate_for_insert;
//!
//! let fields = FieldMap::new()
//!     .with_name("")
//!     .with_price(-1);
//! let err = validate_for_insert(&fields).unwrap_err();
//! assert_eq!(err.field(), "product_name");
//! ```
//!
//! Text is checked after trimming but stored as given.

use crate::error::ValidationError;
use crate::fields::FieldMap;
use crate::query::Column;
use crate::types::NewProduct;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Single-Field Validators
// =============================================================================

/// Validates a required text field (name, supplier, supplier phone).
///
/// ## Example
/// ```rust
/// use stockroom_core::query::Column;
/// use stockroom_core::validation::validate_text;
///
/// assert!(validate_text(Column::Name, "Television").is_ok());
/// assert!(validate_text(Column::Name, "   ").is_err());
/// ```
pub fn validate_text(column: Column, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(column.as_str()));
    }
    Ok(())
}

/// Validates a non-negative integer field (price, quantity).
///
/// Zero is allowed: it is a display sentinel, not an invalid value.
pub fn validate_non_negative(column: Column, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: column.as_str().to_string(),
            value,
        });
    }
    Ok(())
}

// =============================================================================
// Field Map Validators
// =============================================================================

/// Validates a complete insert payload.
///
/// Missing keys count as blank, so the error for an absent name is the
/// same `Required { field: "product_name" }` as for an empty one.
pub fn validate_for_insert(fields: &FieldMap) -> ValidationResult<NewProduct> {
    let name = require_text(Column::Name, fields.name.as_deref())?;
    let price = require_integer(Column::Price, fields.price)?;
    let quantity = require_integer(Column::Quantity, fields.quantity)?;
    let supplier_name = require_text(Column::SupplierName, fields.supplier_name.as_deref())?;
    let supplier_phone = require_text(Column::SupplierPhone, fields.supplier_phone.as_deref())?;

    Ok(NewProduct {
        name: name.to_string(),
        price,
        quantity,
        supplier_name: supplier_name.to_string(),
        supplier_phone: supplier_phone.to_string(),
    })
}

/// Validates a partial update payload: only supplied keys are checked.
pub fn validate_for_update(fields: &FieldMap) -> ValidationResult<()> {
    if let Some(name) = fields.name.as_deref() {
        validate_text(Column::Name, name)?;
    }
    if let Some(price) = fields.price {
        validate_non_negative(Column::Price, price)?;
    }
    if let Some(quantity) = fields.quantity {
        validate_non_negative(Column::Quantity, quantity)?;
    }
    if let Some(supplier) = fields.supplier_name.as_deref() {
        validate_text(Column::SupplierName, supplier)?;
    }
    if let Some(phone) = fields.supplier_phone.as_deref() {
        validate_text(Column::SupplierPhone, phone)?;
    }
    Ok(())
}

fn require_text(column: Column, value: Option<&str>) -> ValidationResult<&str> {
    let value = value.ok_or_else(|| ValidationError::required(column.as_str()))?;
    validate_text(column, value)?;
    Ok(value)
}

fn require_integer(column: Column, value: Option<i64>) -> ValidationResult<i64> {
    let value = value.ok_or_else(|| ValidationError::required(column.as_str()))?;
    validate_non_negative(column, value)?;
    Ok(value)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FieldMap {
        FieldMap::new()
            .with_name("Television")
            .with_price(600)
            .with_quantity(5)
            .with_supplier_name("Samsung")
            .with_supplier_phone("18007267864")
    }

    #[test]
    fn test_insert_accepts_complete_map() {
        let new = validate_for_insert(&complete()).unwrap();
        assert_eq!(new.name, "Television");
        assert_eq!(new.price, 600);
        assert_eq!(new.supplier_phone, "18007267864");
    }

    #[test]
    fn test_insert_allows_zero_sentinels() {
        let fields = complete().with_price(0).with_quantity(0);
        assert!(validate_for_insert(&fields).is_ok());
    }

    #[test]
    fn test_insert_reports_first_failure_in_order() {
        // Everything broken: name is reported first.
        let fields = FieldMap::new()
            .with_name(" ")
            .with_price(-1)
            .with_quantity(-1)
            .with_supplier_name("")
            .with_supplier_phone("");
        assert_eq!(validate_for_insert(&fields).unwrap_err().field(), "product_name");

        let fields = complete().with_price(-1).with_quantity(-1);
        assert_eq!(validate_for_insert(&fields).unwrap_err().field(), "product_price");

        let fields = complete().with_quantity(-1).with_supplier_name("");
        assert_eq!(
            validate_for_insert(&fields).unwrap_err().field(),
            "product_quantity"
        );

        let fields = complete().with_supplier_name("").with_supplier_phone("");
        assert_eq!(
            validate_for_insert(&fields).unwrap_err().field(),
            "product_supplier"
        );

        let fields = complete().with_supplier_phone("\t");
        assert_eq!(
            validate_for_insert(&fields).unwrap_err().field(),
            "product_supplier_number"
        );
    }

    #[test]
    fn test_insert_treats_missing_as_required() {
        let mut fields = complete();
        fields.quantity = None;
        let err = validate_for_insert(&fields).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "product_quantity".to_string()
            }
        );
    }

    #[test]
    fn test_update_checks_only_supplied_keys() {
        assert!(validate_for_update(&FieldMap::new()).is_ok());
        assert!(validate_for_update(&FieldMap::new().with_quantity(2)).is_ok());

        let err = validate_for_update(&FieldMap::new().with_quantity(-1)).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { value: -1, .. }));

        let err = validate_for_update(&FieldMap::new().with_supplier_phone("")).unwrap_err();
        assert_eq!(err.field(), "product_supplier_number");
    }

    #[test]
    fn test_phone_is_free_form() {
        assert!(validate_text(Column::SupplierPhone, "+1 (800) 726-7864 ext. 2").is_ok());
    }
}
