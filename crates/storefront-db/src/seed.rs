//! # Reference Data Seed
//!
//! Loads the three demo stores and their products into an empty database.
//!
//! ```text
//! ┌──────────────┬─────────────┬───────────┬────────┐
//! │ Store        │ Product     │ Inventory │ Price  │
//! ├──────────────┼─────────────┼───────────┼────────┤
//! │ New York     │ Shampoo     │ 30        │ $6.50  │
//! │              │ Conditioner │ 20        │ $5.00  │
//! │              │ Soap        │ 40        │ $4.00  │
//! │ Harrisburg   │ Shampoo     │ 60        │ $5.00  │
//! │              │ Conditioner │ 40        │ $4.00  │
//! │              │ Soap        │ 20        │ $3.00  │
//! │ Austin       │ Shampoo     │ 30        │ $4.00  │
//! │              │ Conditioner │ 30        │ $4.00  │
//! │              │ Soap        │ 60        │ $2.00  │
//! └──────────────┴─────────────┴───────────┴────────┘
//! ```
//!
//! Idempotent and safe to race: the transaction opens with a conditional
//! insert that only fires while both tables are empty. Concurrent seeders
//! serialize on the write lock and every one after the first inserts
//! nothing.

use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use crate::retry::with_timeout;

/// A fixture product: `(name, inventory, price_cents)`.
pub type FixtureProduct = (&'static str, i64, i64);

/// Stores and their products, in insertion order.
pub const FIXTURE: &[(&str, &[FixtureProduct])] = &[
    (
        "New York",
        &[("Shampoo", 30, 650), ("Conditioner", 20, 500), ("Soap", 40, 400)],
    ),
    (
        "Harrisburg",
        &[("Shampoo", 60, 500), ("Conditioner", 40, 400), ("Soap", 20, 300)],
    ),
    (
        "Austin",
        &[("Shampoo", 30, 400), ("Conditioner", 30, 400), ("Soap", 60, 200)],
    ),
];

/// What a seed call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
    Seeded { stores: usize, products: usize },
    AlreadySeeded,
}

/// Seeds the fixture if no store and no product exist yet.
pub async fn seed(db: &Database) -> DbResult<SeedOutcome> {
    let outcome = with_timeout(db.query_timeout(), "seed", async {
        let mut tx = db.pool().begin().await?;

        let Some(first_store_id) = insert_first_store_if_empty(&mut *tx, FIXTURE[0].0).await?
        else {
            // Dropping tx rolls back; nothing was written
            return Ok(SeedOutcome::AlreadySeeded);
        };

        let mut stores = 0;
        let mut products = 0;

        for (index, (location, items)) in FIXTURE.iter().enumerate() {
            let store_id = if index == 0 {
                first_store_id
            } else {
                insert_store(&mut *tx, location).await?
            };
            stores += 1;

            for (name, inventory, price_cents) in items.iter() {
                insert_product(&mut *tx, store_id, name, *inventory, *price_cents).await?;
                products += 1;
            }

            debug!(store_id, location = %location, items = items.len(), "Seeded store");
        }

        tx.commit().await?;

        Ok(SeedOutcome::Seeded { stores, products })
    })
    .await?;

    match outcome {
        SeedOutcome::Seeded { stores, products } => {
            info!(stores, products, "Reference data seeded")
        }
        SeedOutcome::AlreadySeeded => info!("Stores or products present, seed skipped"),
    }

    Ok(outcome)
}

/// Returns the new store's id, or `None` when data already exists.
async fn insert_first_store_if_empty(
    conn: &mut SqliteConnection,
    location: &str,
) -> DbResult<Option<i64>> {
    let result = sqlx::query(
        r#"
        INSERT INTO stores (location)
        SELECT ?1
        WHERE NOT EXISTS (SELECT 1 FROM stores)
          AND NOT EXISTS (SELECT 1 FROM products)
        "#,
    )
    .bind(location)
    .execute(&mut *conn)
    .await?;

    Ok((result.rows_affected() == 1).then(|| result.last_insert_rowid()))
}

async fn insert_store(conn: &mut SqliteConnection, location: &str) -> DbResult<i64> {
    let result = sqlx::query("INSERT INTO stores (location) VALUES (?1)")
        .bind(location)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

async fn insert_product(
    conn: &mut SqliteConnection,
    store_id: i64,
    name: &str,
    inventory: i64,
    price_cents: i64,
) -> DbResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO products (store_id, product_name, inventory, price_cents)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(store_id)
    .bind(name)
    .bind(inventory)
    .bind(price_cents)
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}
