//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use storefront_core::{Customer, NewCustomer, NewProduct, Product, Store};
use storefront_db::{Database, DbConfig};

pub async fn empty_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

pub async fn seeded_db() -> Database {
    let db = empty_db().await;
    storefront_db::seed::seed(&db).await.expect("seed");
    db
}

pub async fn register(db: &Database, first: &str, last: &str, user_name: &str) -> Customer {
    db.customers()
        .insert(&NewCustomer {
            first_name: first.to_string(),
            last_name: last.to_string(),
            user_name: user_name.to_string(),
            password: "password1".to_string(),
        })
        .await
        .expect("register customer")
}

pub async fn stocked_product(db: &Database, location: &str, name: &str, inventory: i64) -> (Store, Product) {
    let store = db.stores().insert(location).await.expect("insert store");
    let product = db
        .products()
        .insert(&NewProduct {
            store_id: store.id,
            product_name: name.to_string(),
            inventory,
            price_cents: 400,
        })
        .await
        .expect("insert product");
    (store, product)
}

/// Finds a seeded product by store location and name.
pub async fn seeded_product(db: &Database, location: &str, name: &str) -> Product {
    db.queries()
        .product_catalog()
        .await
        .expect("catalog")
        .into_iter()
        .find(|l| l.store.location == location && l.product.product_name == name)
        .map(|l| l.product)
        .expect("seeded product")
}
