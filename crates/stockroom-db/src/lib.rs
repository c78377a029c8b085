//! # stockroom-db: Product Store for Stockroom
//!
//! The data-access layer every screen goes through: a URI-addressed store
//! over one SQLite table, with validation, serialized writes and change
//! notification.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  List / editor screens                                                 │
//! │       │  content://com.stockroom.inventory/inventory[/<id>]            │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐       │   │
//! │  │   │ ProductStore │──►│  Repository  │──►│   Database   │       │   │
//! │  │   │  (store.rs)  │   │ (product.rs) │   │  (pool.rs)   │       │   │
//! │  │   └──────┬───────┘   └──────────────┘   └──────────────┘       │   │
//! │  │          │                                                      │   │
//! │  │   ┌──────▼───────┐   ┌──────────────┐   ┌──────────────┐       │   │
//! │  │   │ChangeNotifier│   │ProductCursor │   │  Migrations  │       │   │
//! │  │   │ (notify.rs)  │   │ (cursor.rs)  │   │  (embedded)  │       │   │
//! │  │   └──────────────┘   └──────────────┘   └──────────────┘       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (inventory table, WAL)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `ProductStore`, the request gateway
//! - [`cursor`] - lazy `ProductCursor` and `ProductRow`
//! - [`notify`] - `ChangeNotifier`, `Subscription`, `ChangeEvent`
//! - [`repository`] - SQL for the inventory table
//! - [`pool`] - connection pool creation and configuration
//! - [`config`] - `StoreConfig` (TOML + environment)
//! - [`migrations`] - embedded schema migrations
//! - [`error`] - store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::ProductStore;
//! use stockroom_core::{Address, FieldMap, Projection};
//!
//! let store = ProductStore::open("inventory.db").await?;
//! let mut changes = store.subscribe(Address::Collection, true);
//!
//! let item = store.insert_sample().await?;
//! store.sell(item, 1).await?;
//!
//! let mut cursor = store.query(Address::Collection, Projection::all(), None).await?;
//! while let Some(row) = cursor.next().await? {
//!     println!("{:?}", row);
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod cursor;
pub mod error;
pub mod migrations;
pub mod notify;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use cursor::{ProductCursor, ProductRow};
pub use error::{DbError, DbResult};
pub use notify::{ChangeEvent, ChangeKind, ChangeNotifier, Subscription};
pub use pool::{Database, DbConfig};
pub use repository::ProductRepository;
pub use store::{sample_product, ProductStore, StoreOptions};

// =============================================================================
// Logging
// =============================================================================

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Default filter: `info,stockroom=debug,sqlx=warn`. Calling it twice is
/// harmless; the second call is ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
