//! # Product Cursor
//!
//! Lazy, restartable result sequence returned by `ProductStore::query`.
//!
//! ## Paging
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  page_size = 2                                                          │
//! │                                                                         │
//! │  next() ── buffer empty ──► SELECT ... WHERE _id > 0 LIMIT 2  → [1, 2] │
//! │  next() ── from buffer                                            → 2  │
//! │  next() ── buffer empty ──► SELECT ... WHERE _id > 2 LIMIT 2  → [5]    │
//! │  next() ── short page seen, done                              → None   │
//! │                                                                         │
//! │  rewind() ──► last_id = 0, buffer cleared, start over                  │
//! │  close()  ──► buffer dropped, every later next() is CursorClosed       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cursor only holds a pool handle, never a connection, so an open
//! cursor does not pin a connection and outlives nothing it borrows.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use stockroom_core::query::{Column, ProductFilter, Projection};
use stockroom_core::{Address, FieldValue, Product, ProductId};

use crate::error::{DbError, DbResult};
use crate::repository::product::{ProductRepository, Scope};

// =============================================================================
// Row
// =============================================================================

/// One row as returned by a query: `_id` plus whichever columns were
/// projected. Unprojected columns are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(rename = "product_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "product_price", skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(rename = "product_quantity", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(rename = "product_supplier", skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(
        rename = "product_supplier_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub supplier_phone: Option<String>,
}

impl ProductRow {
    pub fn new(id: ProductId) -> Self {
        ProductRow {
            id,
            name: None,
            price: None,
            quantity: None,
            supplier_name: None,
            supplier_phone: None,
        }
    }

    /// Item address of this row.
    pub fn address(&self) -> Address {
        Address::Item(self.id)
    }

    /// Value of a column, `None` if it was not projected.
    pub fn get(&self, column: Column) -> Option<FieldValue> {
        match column {
            Column::Id => Some(FieldValue::Integer(self.id.get())),
            Column::Name => self.name.clone().map(FieldValue::Text),
            Column::Price => self.price.map(FieldValue::Integer),
            Column::Quantity => self.quantity.map(FieldValue::Integer),
            Column::SupplierName => self.supplier_name.clone().map(FieldValue::Text),
            Column::SupplierPhone => self.supplier_phone.clone().map(FieldValue::Text),
        }
    }

    /// The full product, if every column was projected.
    pub fn into_product(self) -> Option<Product> {
        Some(Product {
            id: self.id,
            name: self.name?,
            price: self.price?,
            quantity: self.quantity?,
            supplier_name: self.supplier_name?,
            supplier_phone: self.supplier_phone?,
        })
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Finite, restartable sequence of rows fetched on demand.
///
/// ## Example
/// ```rust,ignore
/// let mut cursor = store.query(Address::Collection, Projection::all(), None).await?;
/// while let Some(row) = cursor.next().await? {
///     println!("{} {:?}", row.id, row.name);
/// }
/// cursor.close();
/// ```
#[derive(Debug)]
pub struct ProductCursor {
    repo: ProductRepository,
    projection: Projection,
    scope: Scope,
    filter: Option<ProductFilter>,
    page_size: u32,
    last_id: i64,
    buffer: VecDeque<ProductRow>,
    exhausted: bool,
    closed: bool,
    pages_fetched: usize,
}

impl ProductCursor {
    pub(crate) fn new(
        repo: ProductRepository,
        projection: Projection,
        scope: Scope,
        filter: Option<ProductFilter>,
        page_size: u32,
    ) -> Self {
        ProductCursor {
            repo,
            projection,
            scope,
            filter,
            page_size: page_size.max(1),
            last_id: 0,
            buffer: VecDeque::new(),
            exhausted: false,
            closed: false,
            pages_fetched: 0,
        }
    }

    /// Returns the next row, fetching a page if the buffer is empty.
    ///
    /// ## Returns
    /// * `Ok(Some(row))` - next row in id order
    /// * `Ok(None)` - no more rows
    /// * `Err(DbError::CursorClosed)` - cursor was closed
    pub async fn next(&mut self) -> DbResult<Option<ProductRow>> {
        if self.closed {
            return Err(DbError::CursorClosed);
        }

        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page().await?;
        }

        let row = self.buffer.pop_front();
        if let Some(row) = &row {
            self.last_id = row.id.get();
        }
        Ok(row)
    }

    async fn fetch_page(&mut self) -> DbResult<()> {
        let page = self
            .repo
            .fetch_page(
                &self.projection,
                self.scope,
                self.filter.as_ref(),
                self.last_id,
                self.page_size,
            )
            .await?;

        self.pages_fetched += 1;
        debug!(
            after = self.last_id,
            rows = page.len(),
            page = self.pages_fetched,
            "Fetched cursor page"
        );

        if page.len() < self.page_size as usize || matches!(self.scope, Scope::One(_)) {
            self.exhausted = true;
        }
        self.buffer.extend(page);
        Ok(())
    }

    /// Starts over from the first row. Rows written since are visible.
    pub fn rewind(&mut self) -> DbResult<()> {
        if self.closed {
            return Err(DbError::CursorClosed);
        }
        self.last_id = 0;
        self.buffer.clear();
        self.exhausted = false;
        Ok(())
    }

    /// Releases buffered rows. Idempotent.
    pub fn close(&mut self) {
        if !self.closed {
            debug!(pages = self.pages_fetched, "Closing cursor");
        }
        self.closed = true;
        self.buffer.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of pages fetched so far (including after rewinds).
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Drains the remaining rows.
    pub async fn collect_all(&mut self) -> DbResult<Vec<ProductRow>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
