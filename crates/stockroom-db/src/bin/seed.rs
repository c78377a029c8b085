//! # Seed Data Generator
//!
//! Fills an inventory database with sample products for development.
//!
//! ## Usage
//! ```bash
//! # 50 products into the configured database (stockroom.toml / env)
//! cargo run -p stockroom-db --bin seed
//!
//! # Custom amount and file
//! cargo run -p stockroom-db --bin seed -- --count 200 --db ./inventory_dev.db
//! ```
//!
//! The first row is always the sample Television (600, 5, Samsung).
//! The rest cycle through a small catalog of supplier lines with
//! deterministic prices and quantities; every seventh product is out of
//! stock and every eleventh has an unknown (zero) price.

use std::env;
use std::path::PathBuf;

use stockroom_core::{Address, FieldMap};
use stockroom_db::{init_tracing, ProductStore, StoreConfig};

/// Supplier lines: (supplier, phone, products)
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Samsung",
        "18007267864",
        &["Galaxy Phone", "Soundbar", "Monitor", "Tablet", "Microwave"],
    ),
    (
        "Sony",
        "18002227669",
        &["Headphones", "Walkman", "Camera", "Speaker", "Projector"],
    ),
    (
        "Philips",
        "18007441989",
        &["Kettle", "Toaster", "Shaver", "Air Fryer", "Desk Lamp"],
    ),
    (
        "Lenovo",
        "18554536686",
        &["Laptop", "Keyboard", "Mouse", "Docking Station", "Webcam"],
    ),
];

const EDITIONS: &[&str] = &["", " Mini", " Pro", " Max"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>      Number of products to generate (default: 50)");
                println!("  -d, --db <PATH>      Database file (default: from stockroom.toml)");
                println!("      --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let mut config = StoreConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database.path = Some(path);
    }
    let db_config = config.db_config()?;

    println!("🌱 Stockroom Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_config.database_path.display());
    println!("Products: {}", count);
    println!();

    let store = ProductStore::from_config(&config).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = store.count(None).await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        store.close().await;
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    if count > 0 {
        store.insert_sample().await?;
        generated += 1;
    }

    for seed in 0.. {
        if generated >= count {
            break;
        }

        let fields = generate_product(seed);
        if let Err(e) = store.insert(Address::Collection, &fields).await {
            eprintln!("Failed to insert {:?}: {}", fields.name, e);
            return Err(e.into());
        }
        generated += 1;

        if generated % 25 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("Verifying...");
    let in_stock = store
        .count(Some(&stockroom_core::ProductFilter::new().in_stock()))
        .await?;
    println!("  In stock: {} / {}", in_stock, store.count(None).await?);

    store.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds the `seed`-th catalog product.
fn generate_product(seed: usize) -> FieldMap {
    let (supplier, phone, products) = CATALOG[seed % CATALOG.len()];
    let product = products[(seed / CATALOG.len()) % products.len()];
    let edition = EDITIONS[(seed / (CATALOG.len() * 5)) % EDITIONS.len()];

    let price = if seed % 11 == 10 {
        0
    } else {
        20 + ((seed * 37) % 980) as i64
    };
    let quantity = if seed % 7 == 6 {
        0
    } else {
        1 + (seed % 40) as i64
    };

    FieldMap::new()
        .with_name(format!("{}{}", product, edition))
        .with_price(price)
        .with_quantity(quantity)
        .with_supplier_name(supplier)
        .with_supplier_phone(phone)
}
