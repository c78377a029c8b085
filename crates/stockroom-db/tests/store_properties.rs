//! End-to-end behaviour of `ProductStore` against real SQLite databases.

use stockroom_core::query::{Column, ProductFilter, Projection};
use stockroom_core::stock::{apply_sale, SALE_UNIT};
use stockroom_core::{Address, AddressError, FieldMap, Product, ProductId, ValidationError};
use stockroom_db::{DbError, ProductStore};

const AUTHORITY: &str = "com.stockroom.inventory";

fn fields(name: &str, price: i64, quantity: i64, supplier: &str, phone: &str) -> FieldMap {
    FieldMap::new()
        .with_name(name)
        .with_price(price)
        .with_quantity(quantity)
        .with_supplier_name(supplier)
        .with_supplier_phone(phone)
}

fn catalog() -> Vec<FieldMap> {
    vec![
        fields("Television", 600, 5, "Samsung", "18007267864"),
        fields("Walkman", 0, 0, "Sony", "+1 (800) 222-7669"),
        fields("Kettle  ", 35, 12, "Philips", "1800 744 1989"),
        fields("Ünïcode Lamp ☀", 9_223_372_036, 1, "Ikea", "0"),
    ]
}

async fn read_item(store: &ProductStore, address: Address) -> Option<Product> {
    let mut cursor = store
        .query(address, Projection::all(), None)
        .await
        .unwrap();
    let row = cursor.next().await.unwrap();
    assert!(cursor.next().await.unwrap().is_none());
    cursor.close();
    row.and_then(|row| row.into_product())
}

fn as_fields(product: &Product) -> FieldMap {
    fields(
        &product.name,
        product.price,
        product.quantity,
        &product.supplier_name,
        &product.supplier_phone,
    )
}

#[tokio::test]
async fn insert_then_query_returns_inserted_fields_with_fresh_ids() {
    let store = ProductStore::open_in_memory().await.unwrap();
    let mut seen: Vec<ProductId> = Vec::new();

    for input in catalog() {
        let address = store.insert(Address::Collection, &input).await.unwrap();
        let id = address.id().expect("insert returns an item address");
        assert!(!seen.contains(&id));
        seen.push(id);

        let stored = read_item(&store, address).await.unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(as_fields(&stored), input);
    }
}

#[tokio::test]
async fn insert_with_empty_name_fails_and_persists_nothing() {
    let store = ProductStore::open_in_memory().await.unwrap();
    store.insert_sample().await.unwrap();
    let before = store.count(None).await.unwrap();

    let err = store
        .insert(
            Address::Collection,
            &fields("", 10, 1, "Samsung", "18007267864"),
        )
        .await
        .unwrap_err();

    match err {
        DbError::Validation(e) => assert_eq!(e.field(), "product_name"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(store.count(None).await.unwrap(), before);
}

#[tokio::test]
async fn insert_reports_first_invalid_field() {
    let store = ProductStore::open_in_memory().await.unwrap();

    let err = store
        .insert(Address::Collection, &fields("Radio", -5, -1, "", ""))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Validation(ValidationError::Negative { ref field, value: -5 }) if field == "product_price"
    ));

    let mut missing_phone = fields("Radio", 5, 1, "Sony", "x");
    missing_phone.supplier_phone = None;
    let err = store
        .insert(Address::Collection, &missing_phone)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Validation(ref e) if e.field() == "product_supplier_number"));

    assert_eq!(store.count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn update_on_missing_id_changes_nothing() {
    let store = ProductStore::open_in_memory().await.unwrap();
    let address = store.insert_sample().await.unwrap();
    let before = read_item(&store, address).await;

    let ghost = Address::Item(ProductId::new(address.id().unwrap().get() + 100).unwrap());
    let rows = store
        .update(ghost, &FieldMap::new().with_quantity(1))
        .await
        .unwrap();

    assert_eq!(rows, 0);
    assert_eq!(read_item(&store, address).await, before);
    assert_eq!(store.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn update_writes_only_supplied_fields() {
    let store = ProductStore::open_in_memory().await.unwrap();
    let address = store.insert_sample().await.unwrap();

    let rows = store
        .update(
            address,
            &FieldMap::new().with_name("OLED Television").with_price(0),
        )
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let stored = read_item(&store, address).await.unwrap();
    assert_eq!(stored.name, "OLED Television");
    assert_eq!(stored.price, 0);
    assert_eq!(stored.quantity, 5);
    assert_eq!(stored.supplier_name, "Samsung");
}

#[tokio::test]
async fn update_rejects_invalid_supplied_field() {
    let store = ProductStore::open_in_memory().await.unwrap();
    let address = store.insert_sample().await.unwrap();

    let err = store
        .update(address, &FieldMap::new().with_supplier_name("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Validation(ref e) if e.field() == "product_supplier"));
    assert_eq!(read_item(&store, address).await.unwrap().supplier_name, "Samsung");
}

#[tokio::test]
async fn sale_scenario_clamps_at_zero() {
    let store = ProductStore::open_in_memory().await.unwrap();
    let address = store
        .insert(
            Address::Collection,
            &fields("Radio", 40, 3, "Sony", "18002227669"),
        )
        .await
        .unwrap();

    // Caller-driven path: pure outcome, then an explicit update.
    let rows = store
        .update(address, &FieldMap::new().with_quantity(2))
        .await
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(read_item(&store, address).await.unwrap().quantity, 2);

    loop {
        let current = read_item(&store, address).await.unwrap().quantity;
        let outcome = apply_sale(current, SALE_UNIT);
        if !outcome.changed {
            break;
        }
        store
            .update(address, &FieldMap::new().with_quantity(outcome.quantity))
            .await
            .unwrap();
    }
    assert_eq!(read_item(&store, address).await.unwrap().quantity, 0);

    // Serialized path: selling an empty product writes nothing.
    let outcome = store.sell(address, SALE_UNIT).await.unwrap().unwrap();
    assert_eq!(outcome.quantity, 0);
    assert!(!outcome.changed);
    assert_eq!(read_item(&store, address).await.unwrap().quantity, 0);
}

#[tokio::test]
async fn sell_counts_down_and_reports_missing_rows() {
    let store = ProductStore::open_in_memory().await.unwrap();
    let address = store.insert_sample().await.unwrap();

    for expected in (0..5).rev() {
        let outcome = store.sell(address, SALE_UNIT).await.unwrap().unwrap();
        assert_eq!(outcome.quantity, expected);
        assert!(outcome.changed);
    }
    assert!(!store.sell(address, SALE_UNIT).await.unwrap().unwrap().changed);

    let ghost = Address::Item(ProductId::new(999).unwrap());
    assert!(store.sell(ghost, SALE_UNIT).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_sales_never_oversell() {
    let store = std::sync::Arc::new(ProductStore::open_in_memory().await.unwrap());
    let address = store.insert_sample().await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.sell(address, SALE_UNIT).await.unwrap().unwrap().changed
        }));
    }

    let mut sold = 0;
    for handle in handles {
        if handle.await.unwrap() {
            sold += 1;
        }
    }

    assert_eq!(sold, 5);
    assert_eq!(read_item(&store, address).await.unwrap().quantity, 0);
}

#[tokio::test]
async fn delete_all_empties_table_and_old_items_read_as_missing() {
    let store = ProductStore::open_in_memory().await.unwrap();
    let mut addresses = Vec::new();
    for input in catalog() {
        addresses.push(store.insert(Address::Collection, &input).await.unwrap());
    }

    let deleted = store.delete(Address::Collection, None).await.unwrap();
    assert_eq!(deleted, addresses.len() as u64);

    let mut cursor = store
        .query(Address::Collection, Projection::all(), None)
        .await
        .unwrap();
    assert!(cursor.next().await.unwrap().is_none());

    for address in addresses {
        assert!(read_item(&store, address).await.is_none());
        assert_eq!(
            store
                .update(address, &FieldMap::new().with_quantity(1))
                .await
                .unwrap(),
            0
        );
        assert_eq!(store.delete(address, None).await.unwrap(), 0);
    }
}

#[tokio::test]
async fn filtered_collection_delete_and_query() {
    let store = ProductStore::open_in_memory().await.unwrap();
    for input in catalog() {
        store.insert(Address::Collection, &input).await.unwrap();
    }

    let out_of_stock = ProductFilter::new().out_of_stock();
    let rows = store
        .query(
            Address::Collection,
            Projection::of([Column::Name]),
            Some(out_of_stock.clone()),
        )
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name.as_deref(), Some("Walkman"));
    assert!(rows[0].quantity.is_none());

    assert_eq!(
        store
            .delete(Address::Collection, Some(&out_of_stock))
            .await
            .unwrap(),
        1
    );
    assert_eq!(store.count(None).await.unwrap(), 3);
}

#[tokio::test]
async fn wrong_address_kinds_are_rejected() {
    let store = ProductStore::open_in_memory().await.unwrap();
    let item = store.insert_sample().await.unwrap();

    let err = store
        .update(Address::Collection, &FieldMap::new().with_quantity(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::InvalidAddress(AddressError::Unsupported { .. })
    ));

    let err = store
        .insert(item, &fields("Radio", 1, 1, "Sony", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidAddress(_)));
    assert_eq!(store.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn malformed_uris_are_rejected() {
    let store = ProductStore::open_in_memory().await.unwrap();

    for uri in [
        "inventory/1",
        "http://com.stockroom.inventory/inventory",
        "content://com.example.other/inventory",
        "content://com.stockroom.inventory/products",
        "content://com.stockroom.inventory/inventory/0",
        "content://com.stockroom.inventory/inventory/-3",
        "content://com.stockroom.inventory/inventory/abc",
        "content://com.stockroom.inventory/inventory/1/2",
        "content://com.stockroom.inventory/inventory/99999999999999999999",
        "content://com.stockroom.inventory/inventory?x=1",
    ] {
        let result = store.update_uri(uri, &FieldMap::new().with_quantity(1)).await;
        assert!(
            matches!(result, Err(DbError::InvalidAddress(_))),
            "{uri} should be rejected"
        );
    }

    let collection = format!("content://{AUTHORITY}/inventory");
    assert!(store.insert_uri(&collection, &fields("Radio", 1, 1, "Sony", "1")).await.is_ok());
}

#[test]
fn read_only_id_is_rejected_from_form_input() {
    let err = FieldMap::from_pairs([("_id", "5"), ("product_name", "Radio")]).unwrap_err();
    assert!(matches!(err, ValidationError::ReadOnly { .. }));

    let err = FieldMap::from_json(r#"{"_id": 5, "product_name": "Radio"}"#).unwrap_err();
    assert_eq!(err.field(), "_id");
}

#[tokio::test]
async fn ids_are_not_reused_after_delete_all() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.db");

    let last_id = {
        let store = ProductStore::open(&path).await.unwrap();
        store.insert_sample().await.unwrap();
        let last = store.insert_sample().await.unwrap().id().unwrap();
        store.delete(Address::Collection, None).await.unwrap();

        let next = store.insert_sample().await.unwrap().id().unwrap();
        assert!(next > last);
        store.delete(Address::Collection, None).await.unwrap();
        store.close().await;
        next
    };

    let store = ProductStore::open(&path).await.unwrap();
    let after_reopen = store.insert_sample().await.unwrap().id().unwrap();
    assert!(after_reopen > last_id);
    store.close().await;
}

#[tokio::test]
async fn cursor_spans_pages_and_rewinds() {
    let dir = tempfile::tempdir().unwrap();
    let config: stockroom_db::StoreConfig = toml::from_str(&format!(
        r#"
        [database]
        path = {:?}

        [store]
        cursor_page_size = 3
        "#,
        dir.path().join("paged.db")
    ))
    .unwrap();
    let store = ProductStore::from_config(&config).await.unwrap();

    for i in 0..10 {
        store
            .insert(
                Address::Collection,
                &fields(&format!("Item {i}"), i, i, "Acme", "555"),
            )
            .await
            .unwrap();
    }

    let mut cursor = store
        .query(Address::Collection, Projection::all(), None)
        .await
        .unwrap();
    let first_pass = cursor.collect_all().await.unwrap();
    assert_eq!(first_pass.len(), 10);
    assert_eq!(cursor.pages_fetched(), 4);
    assert!(first_pass.windows(2).all(|w| w[0].id < w[1].id));

    store.insert_sample().await.unwrap();
    cursor.rewind().unwrap();
    assert_eq!(cursor.collect_all().await.unwrap().len(), 11);

    cursor.close();
    assert!(matches!(cursor.next().await, Err(DbError::CursorClosed)));
    store.close().await;
}

#[tokio::test]
async fn closed_store_fails_inserts_without_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("closed.db");

    let store = ProductStore::open(&path).await.unwrap();
    store.close().await;

    let err = store.insert_sample().await.unwrap_err();
    assert!(matches!(err, DbError::InsertFailed(_)));

    let store = ProductStore::open(&path).await.unwrap();
    assert_eq!(store.count(None).await.unwrap(), 0);
    store.close().await;
}

#[tokio::test]
async fn closed_store_reports_write_failures_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("closed_writes.db");

    let store = ProductStore::open(&path).await.unwrap();
    let item = store.insert_sample().await.unwrap();
    store.close().await;

    let err = store
        .update(item, &FieldMap::new().with_price(1))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::WriteFailed(_)), "update: {err:?}");

    let err = store.sell(item, 1).await.unwrap_err();
    assert!(matches!(err, DbError::WriteFailed(_)), "sell: {err:?}");

    let err = store.restock(item, 1).await.unwrap_err();
    assert!(matches!(err, DbError::WriteFailed(_)), "restock: {err:?}");

    let err = store.delete(item, None).await.unwrap_err();
    assert!(matches!(err, DbError::WriteFailed(_)), "delete: {err:?}");

    let err = store.delete(Address::Collection, None).await.unwrap_err();
    assert!(matches!(err, DbError::WriteFailed(_)), "delete all: {err:?}");

    let store = ProductStore::open(&path).await.unwrap();
    let product = store.get(item.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(product.price, 600);
    assert_eq!(product.quantity, 5);
    store.close().await;
}
