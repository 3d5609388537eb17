//! Concurrent writers against a WAL database file.

mod common;

use std::time::Duration;

use storefront_core::{NewCustomer, NewProduct};
use storefront_db::{Database, DbConfig, ErrorKind, SeedOutcome};
use tempfile::TempDir;

async fn file_db(dir: &TempDir) -> Database {
    let config = DbConfig::new(dir.path().join("storefront.db"))
        .max_connections(8)
        .busy_timeout(Duration::from_secs(10))
        .query_timeout(Duration::from_secs(10));

    Database::new(config).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_never_oversell() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;

    let store = db.stores().insert("Austin").await.unwrap();
    let product = db
        .products()
        .insert(&NewProduct {
            store_id: store.id,
            product_name: "Soap".to_string(),
            inventory: 2,
            price_cents: 200,
        })
        .await
        .unwrap();
    let buyer = db
        .customers()
        .insert(&NewCustomer {
            first_name: "Michael".to_string(),
            last_name: "Hall".to_string(),
            user_name: "mbhall".to_string(),
            password: "password1".to_string(),
        })
        .await
        .unwrap();

    const ATTEMPTS: usize = 12;

    let handles: Vec<_> = (0..ATTEMPTS)
        .map(|_| {
            let db = db.clone();
            let (product_id, customer_id) = (product.id, buyer.id);
            tokio::spawn(async move { db.placement().place_order(product_id, customer_id, 1).await })
        })
        .collect();

    let mut placed = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::InsufficientInventory, "{err}");
                rejected += 1;
            }
        }
    }

    // Two on hand admits exactly one single-unit order
    assert_eq!(placed, 1);
    assert_eq!(rejected, ATTEMPTS - 1);
    assert_eq!(db.products().get_inventory(product.id).await.unwrap(), 1);
    assert_eq!(db.orders().count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_conserve_stock() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    storefront_db::seed::seed(&db).await.unwrap();

    let buyer = db
        .customers()
        .insert(&NewCustomer {
            first_name: "Maria".to_string(),
            last_name: "Stone".to_string(),
            user_name: "mstone".to_string(),
            password: "password1".to_string(),
        })
        .await
        .unwrap();
    let shampoo = common::seeded_product(&db, "Harrisburg", "Shampoo").await; // 60 on hand

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let db = db.clone();
            let (product_id, customer_id) = (shampoo.id, buyer.id);
            tokio::spawn(async move { db.placement().place_order(product_id, customer_id, 4).await })
        })
        .collect();

    let mut units_sold = 0;
    for handle in handles {
        if let Ok(order) = handle.await.unwrap() {
            units_sold += order.quantity;
        }
    }

    let remaining = db.products().get_inventory(shampoo.id).await.unwrap();
    assert!(remaining > 0);
    assert_eq!(remaining + units_sold, 60);
    // 60 admits fourteen orders of 4 (stock must stay above each request)
    assert_eq!(units_sold, 56);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_seeders_load_fixture_once() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move { storefront_db::seed::seed(&db).await })
        })
        .collect();

    let mut seeded = 0;
    for handle in handles {
        if let SeedOutcome::Seeded { .. } = handle.await.unwrap().unwrap() {
            seeded += 1;
        }
    }

    assert_eq!(seeded, 1);
    assert_eq!(db.stores().count().await.unwrap(), 3);
    assert_eq!(db.products().count().await.unwrap(), 9);
}
