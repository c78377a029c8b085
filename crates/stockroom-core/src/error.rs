//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Umbrella for the two below                     │
//! │  ├── AddressError     - Malformed / unsupported addresses              │
//! │  └── ValidationError  - Field map failures (names the field)           │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Store failures (wraps both of the above)       │
//! │                                                                         │
//! │  Flow: ValidationError / AddressError → DbError → UI layer             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Not-found is deliberately absent: a missing row is a zero count.

use thiserror::Error;

// =============================================================================
// Address Error
// =============================================================================

/// Why an address could not be resolved to `Collection` or `Item(id)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The string is not a URI at all.
    #[error("Invalid address '{uri}': {reason}")]
    Malformed { uri: String, reason: String },

    /// Scheme other than `content`.
    #[error("Invalid address '{uri}': unsupported scheme '{scheme}'")]
    UnsupportedScheme { uri: String, scheme: String },

    /// Authority does not belong to this store.
    #[error("Invalid address '{uri}': unknown authority '{authority}'")]
    UnknownAuthority { uri: String, authority: String },

    /// Path is not `inventory` or `inventory/<id>`.
    #[error("Invalid address '{uri}': unrecognized path '{path}'")]
    UnknownPath { uri: String, path: String },

    /// Trailing identifier is not a positive integer.
    #[error("Invalid address '{uri}': '{segment}' is not a positive row id")]
    InvalidId { uri: String, segment: String },

    /// The operation needs the other kind of address.
    ///
    /// ## When This Occurs
    /// - `insert` against an item address
    /// - `update` / `sell` against the collection address
    #[error("{operation} is not supported on '{address}'")]
    Unsupported { operation: String, address: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field map validation errors.
///
/// Every variant carries the stable column key of the offending field,
/// e.g. `product_name`, so callers can point at the exact input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric field is below zero.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: i64 },

    /// Text supplied where an integer was expected.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Key is not part of the product schema.
    #[error("{field} is not a product field")]
    UnknownField { field: String },

    /// Key exists but can't be written (the row id).
    #[error("{field} is read-only")]
    ReadOnly { field: String },
}

impl ValidationError {
    /// Returns the column key this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::Negative { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::UnknownField { field }
            | ValidationError::ReadOnly { field } => field,
        }
    }

    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for callers that handle both kinds the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
