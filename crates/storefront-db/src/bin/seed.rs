//! # Seed Reference Data
//!
//! Creates (or opens) a database, applies migrations, and loads the demo
//! stores and products.
//!
//! ## Usage
//! ```bash
//! # Path from STOREFRONT_DB_PATH, or ./storefront.db
//! cargo run -p storefront-db --bin seed
//!
//! # Explicit database path
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db
//!
//! # More detail
//! RUST_LOG=storefront_db=debug cargo run -p storefront-db --bin seed
//! ```
//!
//! Running it against an already seeded database changes nothing.

use std::env;
use std::path::PathBuf;

use storefront_db::{AppConfig, Database, SeedOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let mut config = AppConfig::load()?;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(path) = args.get(i + 1) {
                    config.db_path = PathBuf::from(path);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storefront Seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $STOREFRONT_DB_PATH or ./storefront.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {other}");
            }
        }
        i += 1;
    }

    info!(path = %config.db_path.display(), "Opening database");

    let db = Database::new(config.db_config()).await?;

    match storefront_db::seed::seed(&db).await? {
        SeedOutcome::Seeded { stores, products } => {
            println!("✓ Seeded {stores} stores and {products} products");
        }
        SeedOutcome::AlreadySeeded => {
            println!("⚠ Database already has stores or products");
            println!("  Skipping seed to avoid duplicates.");
        }
    }

    let catalog = db.queries().product_selection_list().await?;
    for item in &catalog {
        println!("  {}", item.label);
    }

    db.close().await;
    Ok(())
}
