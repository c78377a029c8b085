//! # stockroom-core: Pure Inventory Rules for Stockroom
//!
//! This crate holds every rule of the product store that does not need a
//! database: what a product is, how addresses resolve, which field maps
//! are valid, and how a sale changes a quantity.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  List / Detail UI (consumer)                    │   │
//! │  │    catalog list ──► editor ──► sale button ──► delete all       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ addresses + field maps                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ address  │ │  fields  │ │validation│ │  stock   │          │   │
//! │  │   │ Address  │ │ FieldMap │ │  order   │ │ apply_   │          │   │
//! │  │   │ parse    │ │ from_*   │ │  rules   │ │ sale     │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              stockroom-db (ProductStore, SQLite)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Product`, `ProductId`, `NewProduct`, display sentinels
//! - [`address`] - `Address` parsing (`Collection` / `Item(id)`)
//! - [`fields`] - `FieldMap` request payloads
//! - [`query`] - columns, projections, filters
//! - [`validation`] - ordered field checks
//! - [`stock`] - pure sale / restock arithmetic
//! - [`error`] - domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{Address, FieldMap, DEFAULT_AUTHORITY};
//! use stockroom_core::stock::{apply_sale, SALE_UNIT};
//!
//! let address = Address::parse("content://com.stockroom.inventory/inventory/7", DEFAULT_AUTHORITY).unwrap();
//! assert!(!address.is_collection());
//!
//! let outcome = apply_sale(3, SALE_UNIT);
//! let update = FieldMap::new().with_quantity(outcome.quantity);
//! assert_eq!(update.quantity, Some(2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod address;
pub mod error;
pub mod fields;
pub mod query;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use address::Address;
pub use error::{AddressError, CoreError, ValidationError};
pub use fields::FieldMap;
pub use query::{Column, ProductFilter, Projection};
pub use stock::SaleOutcome;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// URI scheme of every store address.
pub const SCHEME: &str = "content";

/// Authority used when none is configured.
pub const DEFAULT_AUTHORITY: &str = "com.stockroom.inventory";
