//! # Product Repository
//!
//! Database operations for the `inventory` table.
//!
//! ## Key Operations
//! - Keyset-paged reads for cursors
//! - Partial updates that write only the supplied columns
//! - Filtered deletes and counts
//!
//! ## Filter Rendering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductFilter { supplier: "Samsung", in_stock: true }                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ... WHERE 1 = 1                                                        │
//! │        AND product_supplier = ?        ← bound, never interpolated      │
//! │        AND product_quantity > 0                                        │
//! │                                                                         │
//! │  Column names come from the Column enum; values are always bound.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use stockroom_core::query::{Column, ProductFilter, Projection, TABLE_NAME};
use stockroom_core::{FieldMap, FieldValue, NewProduct, Product, ProductId};

use crate::cursor::ProductRow;
use crate::error::{DbError, DbResult};

/// Which rows a read covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    One(ProductId),
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let id = repo.insert(&new_product).await?;
/// let product = repo.get(id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inserts a validated product and returns its assigned id.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<ProductId> {
        debug!(name = %product.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO inventory (
                product_name, product_price, product_quantity,
                product_supplier, product_supplier_number
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&product.supplier_name)
        .bind(&product.supplier_phone)
        .execute(&self.pool)
        .await?;

        ProductId::new(result.last_insert_rowid())
            .ok_or_else(|| DbError::Internal("SQLite returned a non-positive row id".into()))
    }

    /// Writes only the columns present in `fields`.
    ///
    /// ## Returns
    /// Rows changed: 0 when the map is empty or the id does not exist.
    pub async fn update_fields(&self, id: ProductId, fields: &FieldMap) -> DbResult<u64> {
        let entries = fields.entries();
        if entries.is_empty() {
            return Ok(0);
        }

        debug!(id = %id, columns = entries.len(), "Updating product");

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE ");
        builder.push(TABLE_NAME).push(" SET ");

        let mut assignments = builder.separated(", ");
        for (column, value) in entries {
            assignments.push(column.as_str());
            assignments.push_unseparated(" = ");
            match value {
                FieldValue::Integer(v) => assignments.push_bind_unseparated(v),
                FieldValue::Text(v) => assignments.push_bind_unseparated(v),
            };
        }

        builder.push(" WHERE _id = ").push_bind(id.get());

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Sets the quantity column of one row.
    pub async fn set_quantity(&self, id: ProductId, quantity: i64) -> DbResult<u64> {
        let result = sqlx::query("UPDATE inventory SET product_quantity = ?1 WHERE _id = ?2")
            .bind(quantity)
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes one row. Returns 0 if it did not exist.
    pub async fn delete_by_id(&self, id: ProductId) -> DbResult<u64> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM inventory WHERE _id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes every row matching `filter` (all rows for an empty filter).
    pub async fn delete_where(&self, filter: &ProductFilter) -> DbResult<u64> {
        debug!(?filter, "Deleting products");

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM ");
        builder.push(TABLE_NAME).push(" WHERE 1 = 1");
        push_filter(&mut builder, filter);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Fetches the next page of rows with `_id > after`, in id order.
    ///
    /// Keyset paging: no OFFSET, so a page boundary stays stable while
    /// rows are inserted or deleted between calls.
    pub async fn fetch_page(
        &self,
        projection: &Projection,
        scope: Scope,
        filter: Option<&ProductFilter>,
        after: i64,
        limit: u32,
    ) -> DbResult<Vec<ProductRow>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
        {
            let mut columns = builder.separated(", ");
            for column in projection.columns() {
                columns.push(column.as_str());
            }
        }
        builder
            .push(" FROM ")
            .push(TABLE_NAME)
            .push(" WHERE _id > ")
            .push_bind(after);

        if let Scope::One(id) = scope {
            builder.push(" AND _id = ").push_bind(id.get());
        }
        if let Some(filter) = filter {
            push_filter(&mut builder, filter);
        }

        builder
            .push(" ORDER BY _id LIMIT ")
            .push_bind(i64::from(limit));

        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| decode_row(row, projection))
            .collect()
    }

    /// Gets a product by its id.
    pub async fn get(&self, id: ProductId) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                _id,
                product_name,
                product_price,
                product_quantity,
                product_supplier,
                product_supplier_number
            FROM inventory
            WHERE _id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Current quantity of one row, `None` if it does not exist.
    pub async fn quantity_of(&self, id: ProductId) -> DbResult<Option<i64>> {
        let quantity = sqlx::query_scalar::<_, i64>(
            "SELECT product_quantity FROM inventory WHERE _id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(quantity)
    }

    /// Counts rows matching `filter`.
    pub async fn count(&self, filter: Option<&ProductFilter>) -> DbResult<i64> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM ");
        builder.push(TABLE_NAME).push(" WHERE 1 = 1");
        if let Some(filter) = filter {
            push_filter(&mut builder, filter);
        }

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Appends ` AND ...` conditions for every set filter field.
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    if let Some(needle) = &filter.name_contains {
        builder
            .push(" AND instr(lower(product_name), lower(")
            .push_bind(needle.clone())
            .push(")) > 0");
    }
    if let Some(supplier) = &filter.supplier {
        builder
            .push(" AND product_supplier = ")
            .push_bind(supplier.clone());
    }
    match filter.in_stock {
        Some(true) => {
            builder.push(" AND product_quantity > 0");
        }
        Some(false) => {
            builder.push(" AND product_quantity = 0");
        }
        None => {}
    }
    if let Some(min) = filter.min_quantity {
        builder.push(" AND product_quantity >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        builder.push(" AND product_price <= ").push_bind(max);
    }
}

/// Reads the projected columns of one row.
fn decode_row(row: &SqliteRow, projection: &Projection) -> DbResult<ProductRow> {
    let raw_id: i64 = row.try_get(Column::Id.as_str())?;
    let id = ProductId::new(raw_id)
        .ok_or_else(|| DbError::Internal(format!("invalid row id {}", raw_id)))?;

    let mut out = ProductRow::new(id);
    for column in projection.columns() {
        match column {
            Column::Id => {}
            Column::Name => out.name = Some(row.try_get(column.as_str())?),
            Column::Price => out.price = Some(row.try_get(column.as_str())?),
            Column::Quantity => out.quantity = Some(row.try_get(column.as_str())?),
            Column::SupplierName => out.supplier_name = Some(row.try_get(column.as_str())?),
            Column::SupplierPhone => out.supplier_phone = Some(row.try_get(column.as_str())?),
        }
    }
    Ok(out)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn product(name: &str, supplier: &str, price: i64, quantity: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price,
            quantity,
            supplier_name: supplier.to_string(),
            supplier_phone: "18007267864".to_string(),
        }
    }

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let id = repo
            .insert(&product("Television", "Samsung", 600, 5))
            .await
            .unwrap();

        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Television");
        assert_eq!(stored.quantity, 5);
        assert_eq!(stored.id, id);
    }

    #[tokio::test]
    async fn test_update_writes_only_supplied_columns() {
        let repo = repo().await;
        let id = repo
            .insert(&product("Radio", "Sony", 40, 2))
            .await
            .unwrap();

        let rows = repo
            .update_fields(id, &FieldMap::new().with_price(45))
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.price, 45);
        assert_eq!(stored.name, "Radio");
        assert_eq!(stored.quantity, 2);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_zero() {
        let repo = repo().await;
        let id = ProductId::new(99).unwrap();
        let rows = repo
            .update_fields(id, &FieldMap::new().with_quantity(1))
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_filters() {
        let repo = repo().await;
        repo.insert(&product("Television", "Samsung", 600, 5)).await.unwrap();
        repo.insert(&product("Galaxy Phone", "Samsung", 900, 0)).await.unwrap();
        repo.insert(&product("Walkman", "Sony", 0, 3)).await.unwrap();

        let samsung = ProductFilter::new().supplier("Samsung");
        assert_eq!(repo.count(Some(&samsung)).await.unwrap(), 2);

        let samsung_in_stock = ProductFilter::new().supplier("Samsung").in_stock();
        assert_eq!(repo.count(Some(&samsung_in_stock)).await.unwrap(), 1);

        let by_name = ProductFilter::new().name_contains("PHONE");
        assert_eq!(repo.count(Some(&by_name)).await.unwrap(), 1);

        let cheap = ProductFilter::new().max_price(600).min_quantity(3);
        assert_eq!(repo.count(Some(&cheap)).await.unwrap(), 2);

        assert_eq!(repo.count(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_where_matches_filter_only() {
        let repo = repo().await;
        repo.insert(&product("Television", "Samsung", 600, 5)).await.unwrap();
        repo.insert(&product("Walkman", "Sony", 50, 0)).await.unwrap();

        let deleted = repo
            .delete_where(&ProductFilter::new().out_of_stock())
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(repo.count(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_page_projection_and_keyset() {
        let repo = repo().await;
        for i in 0..5 {
            repo.insert(&product(&format!("Item {}", i), "Acme", 1, 1))
                .await
                .unwrap();
        }

        let projection = Projection::of([Column::Name]);
        let first = repo
            .fetch_page(&projection, Scope::All, None, 0, 2)
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name.as_deref(), Some("Item 0"));
        assert!(first[0].price.is_none());

        let after = first[1].id.get();
        let second = repo
            .fetch_page(&projection, Scope::All, None, after, 10)
            .await
            .unwrap();
        assert_eq!(second.len(), 3);
        assert!(second.iter().all(|row| row.id.get() > after));
    }
}
