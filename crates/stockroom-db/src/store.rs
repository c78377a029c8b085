//! # Product Store
//!
//! The single gateway to persisted product data.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ProductStore Dispatch                              │
//! │                                                                         │
//! │  "content://com.stockroom.inventory/inventory/7"                       │
//! │       │  Address::parse                                                 │
//! │       ▼                                                                 │
//! │  Address::Item(7) ──────────┬──────────────┬──────────────┐            │
//! │                             │              │              │            │
//! │        query ◄── any        │  update ◄── Item only       │            │
//! │        delete ◄── any       │  sell/restock ◄── Item only │            │
//! │        insert ◄── Collection only                         │            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate (stockroom-core) ── fails ──► DbError::Validation            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write gate (one writer at a time; reads skip it)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductRepository (SQL)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ChangeNotifier.publish, then return                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Notifications Per Operation
//! | Operation        | Published when     | Addresses                |
//! |------------------|--------------------|--------------------------|
//! | insert           | always             | collection               |
//! | update / sell    | 1 row changed      | item, then collection    |
//! | delete           | count > 0          | collection               |

use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use stockroom_core::query::{Column, ProductFilter, Projection};
use stockroom_core::stock::{apply_restock, apply_sale, SaleOutcome};
use stockroom_core::validation::{validate_for_insert, validate_for_update};
use stockroom_core::{Address, FieldMap, Product, ProductId};

use crate::config::StoreConfig;
use crate::cursor::ProductCursor;
use crate::error::{DbError, DbResult};
use crate::notify::{ChangeKind, ChangeNotifier, Subscription};
use crate::pool::{Database, DbConfig};
use crate::repository::product::{ProductRepository, Scope};

/// The canonical sample product inserted by `insert_sample`.
pub fn sample_product() -> FieldMap {
    FieldMap::new()
        .with_name("Television")
        .with_price(600)
        .with_quantity(5)
        .with_supplier_name("Samsung")
        .with_supplier_phone("18007267864")
}

/// Store options that are not pool settings.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub authority: String,
    pub cursor_page_size: u32,
    pub notification_capacity: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        let settings = StoreConfig::default().store;
        StoreOptions {
            authority: settings.authority,
            cursor_page_size: settings.cursor_page_size,
            notification_capacity: settings.notification_capacity,
        }
    }
}

impl From<&StoreConfig> for StoreOptions {
    fn from(config: &StoreConfig) -> Self {
        StoreOptions {
            authority: config.store.authority.clone(),
            cursor_page_size: config.store.cursor_page_size,
            notification_capacity: config.store.notification_capacity,
        }
    }
}

/// URI-addressed product store.
///
/// ## Usage
/// ```rust,ignore
/// let store = ProductStore::open_in_memory().await?;
///
/// let address = store.insert(Address::Collection, &fields).await?;
/// let rows = store.update(address, &FieldMap::new().with_quantity(2)).await?;
///
/// let mut cursor = store.query(Address::Collection, Projection::all(), None).await?;
/// while let Some(row) = cursor.next().await? { /* ... */ }
/// ```
#[derive(Debug)]
pub struct ProductStore {
    db: Database,
    repo: ProductRepository,
    write_gate: Mutex<()>,
    notifier: ChangeNotifier,
    options: StoreOptions,
}

impl ProductStore {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Wraps an open database.
    pub fn new(db: Database, options: StoreOptions) -> Self {
        let repo = db.products();
        let notifier = ChangeNotifier::new(options.notification_capacity);
        ProductStore {
            db,
            repo,
            write_gate: Mutex::new(()),
            notifier,
            options,
        }
    }

    /// Opens a pool with `db_config` and wraps it.
    pub async fn connect(db_config: DbConfig, options: StoreOptions) -> DbResult<Self> {
        let db = Database::new(db_config).await?;
        info!(authority = %options.authority, "Product store ready");
        Ok(Self::new(db, options))
    }

    /// Opens the store described by a loaded `StoreConfig`.
    pub async fn from_config(config: &StoreConfig) -> DbResult<Self> {
        Self::connect(config.db_config()?, StoreOptions::from(config)).await
    }

    /// Opens a file-backed store with default options.
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        Self::connect(DbConfig::new(path), StoreOptions::default()).await
    }

    /// Opens a private in-memory store (for tests).
    pub async fn open_in_memory() -> DbResult<Self> {
        Self::connect(DbConfig::in_memory(), StoreOptions::default()).await
    }

    pub fn authority(&self) -> &str {
        &self.options.authority
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Parses a URI against this store's authority.
    pub fn parse(&self, uri: &str) -> DbResult<Address> {
        Address::parse(uri, &self.options.authority).map_err(|e| {
            warn!(uri, error = %e, "Rejected address");
            DbError::from(e)
        })
    }

    /// Canonical URI of an address under this store's authority.
    pub fn uri_of(&self, address: Address) -> String {
        address.to_uri(&self.options.authority)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns a lazy cursor over the rows at `address`.
    ///
    /// Nothing matching yields an empty cursor, not an error.
    pub async fn query(
        &self,
        address: Address,
        projection: Projection,
        filter: Option<ProductFilter>,
    ) -> DbResult<ProductCursor> {
        debug!(%address, columns = projection.columns().len(), "Query");

        let scope = match address {
            Address::Collection => Scope::All,
            Address::Item(id) => Scope::One(id),
        };
        let filter = filter.filter(|f| !f.is_empty());

        Ok(ProductCursor::new(
            self.repo.clone(),
            projection,
            scope,
            filter,
            self.options.cursor_page_size,
        ))
    }

    pub async fn query_uri(
        &self,
        uri: &str,
        projection: Projection,
        filter: Option<ProductFilter>,
    ) -> DbResult<ProductCursor> {
        let address = self.parse(uri)?;
        self.query(address, projection, filter).await
    }

    /// Fetches one product.
    pub async fn get(&self, id: ProductId) -> DbResult<Option<Product>> {
        self.repo.get(id).await
    }

    /// Counts rows matching `filter` (all rows for `None`).
    pub async fn count(&self, filter: Option<&ProductFilter>) -> DbResult<i64> {
        self.repo.count(filter).await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a product and returns its item address.
    ///
    /// ## Errors
    /// * `InvalidAddress` - `address` is not the collection
    /// * `Validation` - first failing field, in column order
    /// * `InsertFailed` - storage rejected the row; nothing persisted
    pub async fn insert(&self, address: Address, fields: &FieldMap) -> DbResult<Address> {
        address.require_collection("insert")?;
        let new = validate_for_insert(fields).map_err(|e| {
            debug!(field = e.field(), "Insert rejected");
            DbError::from(e)
        })?;

        let id = {
            let _gate = self.write_gate.lock().await;
            let id = self
                .repo
                .insert(&new)
                .await
                .map_err(DbError::into_insert_failure)?;
            self.notifier
                .notify(Address::Collection, ChangeKind::Inserted, 1);
            id
        };

        debug!(%id, "Inserted product");
        Ok(Address::Item(id))
    }

    pub async fn insert_uri(&self, uri: &str, fields: &FieldMap) -> DbResult<Address> {
        let address = self.parse(uri)?;
        self.insert(address, fields).await
    }

    /// Inserts the sample product (Television / Samsung).
    pub async fn insert_sample(&self) -> DbResult<Address> {
        self.insert(Address::Collection, &sample_product()).await
    }

    /// Writes the supplied fields of one row.
    ///
    /// ## Returns
    /// * `Ok(0)` - empty field map, or no such row (no notification)
    /// * `Ok(1)` - row changed; item and collection notified
    pub async fn update(&self, address: Address, fields: &FieldMap) -> DbResult<u64> {
        let id = address.require_item("update")?;
        if fields.is_empty() {
            debug!(%address, "Empty update ignored");
            return Ok(0);
        }
        validate_for_update(fields)?;

        let _gate = self.write_gate.lock().await;
        let rows = self
            .repo
            .update_fields(id, fields)
            .await
            .map_err(DbError::into_write_failure)?;

        if rows > 0 {
            self.notify_item_changed(id, rows);
        }
        debug!(%address, rows, "Update");
        Ok(rows)
    }

    pub async fn update_uri(&self, uri: &str, fields: &FieldMap) -> DbResult<u64> {
        let address = self.parse(uri)?;
        self.update(address, fields).await
    }

    /// Deletes the row at an item address, or every row (matching
    /// `filter`, if any) at the collection address.
    ///
    /// A filter on an item address narrows the single-row delete.
    pub async fn delete(&self, address: Address, filter: Option<&ProductFilter>) -> DbResult<u64> {
        let _gate = self.write_gate.lock().await;

        let rows = match (address, filter) {
            (Address::Item(id), None) => self.repo.delete_by_id(id).await,
            (Address::Item(id), Some(filter)) => self.delete_item_if(id, filter).await,
            (Address::Collection, filter) => {
                let filter = filter.cloned().unwrap_or_default();
                self.repo.delete_where(&filter).await
            }
        }
        .map_err(DbError::into_write_failure)?;

        if rows > 0 {
            self.notifier
                .notify(Address::Collection, ChangeKind::Deleted, rows);
        }
        info!(%address, rows, "Delete");
        Ok(rows)
    }

    pub async fn delete_uri(&self, uri: &str, filter: Option<&ProductFilter>) -> DbResult<u64> {
        let address = self.parse(uri)?;
        self.delete(address, filter).await
    }

    async fn delete_item_if(&self, id: ProductId, filter: &ProductFilter) -> DbResult<u64> {
        let matching = self
            .repo
            .fetch_page(&Projection::of([Column::Id]), Scope::One(id), Some(filter), 0, 1)
            .await?;
        if matching.is_empty() {
            return Ok(0);
        }
        self.repo.delete_by_id(id).await
    }

    /// Sells `amount` units of one product, clamping at zero.
    ///
    /// Read and write happen under the write gate, so two concurrent sales
    /// never both read the same quantity.
    ///
    /// ## Returns
    /// * `Ok(None)` - no such row
    /// * `Ok(Some(outcome))` - `outcome.changed` is false when already at 0;
    ///   nothing is written or published in that case
    pub async fn sell(&self, address: Address, amount: i64) -> DbResult<Option<SaleOutcome>> {
        let id = address.require_item("sell")?;
        self.adjust_quantity(id, |current| apply_sale(current, amount))
            .await
    }

    pub async fn sell_uri(&self, uri: &str, amount: i64) -> DbResult<Option<SaleOutcome>> {
        let address = self.parse(uri)?;
        self.sell(address, amount).await
    }

    /// Adds `amount` units to one product.
    pub async fn restock(&self, address: Address, amount: i64) -> DbResult<Option<SaleOutcome>> {
        let id = address.require_item("restock")?;
        self.adjust_quantity(id, |current| apply_restock(current, amount))
            .await
    }

    async fn adjust_quantity(
        &self,
        id: ProductId,
        change: impl FnOnce(i64) -> SaleOutcome,
    ) -> DbResult<Option<SaleOutcome>> {
        let _gate = self.write_gate.lock().await;

        let Some(current) = self
            .repo
            .quantity_of(id)
            .await
            .map_err(DbError::into_write_failure)?
        else {
            return Ok(None);
        };

        let outcome = change(current);
        if !outcome.changed {
            debug!(%id, quantity = current, "Quantity unchanged");
            return Ok(Some(outcome));
        }

        let rows = self
            .repo
            .set_quantity(id, outcome.quantity)
            .await
            .map_err(DbError::into_write_failure)?;
        if rows == 0 {
            return Ok(None);
        }

        self.notify_item_changed(id, rows);
        debug!(%id, from = current, to = outcome.quantity, "Quantity adjusted");
        Ok(Some(outcome))
    }

    fn notify_item_changed(&self, id: ProductId, rows: u64) {
        self.notifier
            .notify(Address::Item(id), ChangeKind::Updated, rows);
        self.notifier
            .notify(Address::Collection, ChangeKind::Updated, rows);
    }

    // =========================================================================
    // Notification
    // =========================================================================

    /// Subscribes to changes at `address` (see [`crate::notify`]).
    pub fn subscribe(&self, address: Address, descendants: bool) -> Subscription {
        self.notifier.subscribe(address, descendants)
    }

    pub fn subscribe_uri(&self, uri: &str, descendants: bool) -> DbResult<Subscription> {
        Ok(self.subscribe(self.parse(uri)?, descendants))
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Closes the pool. Open cursors fail on their next page fetch.
    pub async fn close(&self) {
        let _gate = self.write_gate.lock().await;
        self.db.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_sample() {
        let store = ProductStore::open_in_memory().await.unwrap();
        let address = store.insert_sample().await.unwrap();

        let product = store.get(address.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(product.name, "Television");
        assert_eq!(product.price, 600);
        assert_eq!(product.quantity, 5);
        assert_eq!(product.supplier_name, "Samsung");
        assert_eq!(product.supplier_phone, "18007267864");
    }

    #[tokio::test]
    async fn test_uri_round_trip() {
        let store = ProductStore::open_in_memory().await.unwrap();
        let address = store.insert_sample().await.unwrap();

        let uri = store.uri_of(address);
        assert_eq!(store.parse(&uri).unwrap(), address);
    }

    #[tokio::test]
    async fn test_item_delete_with_filter() {
        let store = ProductStore::open_in_memory().await.unwrap();
        let address = store.insert_sample().await.unwrap();

        let other_supplier = ProductFilter::new().supplier("Sony");
        assert_eq!(store.delete(address, Some(&other_supplier)).await.unwrap(), 0);

        let samsung = ProductFilter::new().supplier("Samsung");
        assert_eq!(store.delete(address, Some(&samsung)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_restock_adds_units() {
        let store = ProductStore::open_in_memory().await.unwrap();
        let address = store.insert_sample().await.unwrap();

        let outcome = store.restock(address, 3).await.unwrap().unwrap();
        assert_eq!(outcome.quantity, 8);
        assert!(store.restock(address, 0).await.unwrap().is_some_and(|o| !o.changed));
    }
}
