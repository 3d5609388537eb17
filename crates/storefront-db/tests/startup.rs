//! Opening a database file from application config.

use storefront_db::{AppConfig, Database};
use tempfile::TempDir;

fn config_in(dir: &TempDir, seed_on_startup: bool) -> AppConfig {
    AppConfig {
        db_path: dir.path().join("storefront.db"),
        seed_on_startup,
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn reopening_with_seed_on_startup_loads_fixture_once() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, true);

    let first = Database::open(&config).await.unwrap();
    assert_eq!(first.stores().count().await.unwrap(), 3);
    assert_eq!(first.products().count().await.unwrap(), 9);
    first.close().await;

    let second = Database::open(&config).await.unwrap();
    assert_eq!(second.stores().count().await.unwrap(), 3);
    assert_eq!(second.products().count().await.unwrap(), 9);

    let labels = second.queries().product_selection_list().await.unwrap();
    assert_eq!(labels[0].label, "New York | Shampoo | Inventory: 30 @ $6.50 each");
    second.close().await;
}

#[tokio::test]
async fn open_without_seed_leaves_database_empty() {
    let dir = TempDir::new().unwrap();

    let db = Database::open(&config_in(&dir, false)).await.unwrap();

    assert!(db.health_check().await);
    assert_eq!(db.stores().count().await.unwrap(), 0);
    assert_eq!(db.products().count().await.unwrap(), 0);
    db.close().await;
}

#[tokio::test]
async fn stock_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, true);

    let db = Database::open(&config).await.unwrap();
    let buyer = db
        .customers()
        .insert(&storefront_core::NewCustomer {
            first_name: "Michael".to_string(),
            last_name: "Hall".to_string(),
            user_name: "mbhall".to_string(),
            password: "password1".to_string(),
        })
        .await
        .unwrap();
    // New York Shampoo, 30 on hand
    let shampoo = db.queries().product_catalog().await.unwrap()[0].product.clone();
    db.placement().place_order(shampoo.id, buyer.id, 5).await.unwrap();
    db.close().await;

    let reopened = Database::open(&config).await.unwrap();
    assert_eq!(reopened.products().get_inventory(shampoo.id).await.unwrap(), 25);
    assert_eq!(reopened.orders().count().await.unwrap(), 1);
    reopened.close().await;
}
