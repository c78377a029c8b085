//! # Repository Module
//!
//! SQL access for the inventory table.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductStore          addresses, validation, write gate, notify       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductRepository     plain SQL keyed by ProductId / ProductFilter    │
//! │  ├── insert(&NewProduct)        → ProductId                            │
//! │  ├── update_fields(id, &FieldMap) → rows                               │
//! │  ├── delete_by_id / delete_where  → rows                               │
//! │  ├── fetch_page(scope, after, limit) → Vec<ProductRow>                 │
//! │  └── get / quantity_of / count                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (inventory)                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repository knows nothing about addresses or notifications, so it can
//! be driven directly in tests and by the seed binary.

pub mod product;

pub use product::ProductRepository;
