//! # Product Repository
//!
//! Database operations for products and their inventory.
//!
//! ## Inventory Mutations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, subtract in Rust, write back                          │
//! │     UPDATE products SET inventory = 7 WHERE id = ?                     │
//! │     (two concurrent orders both read 10, both write 7)                 │
//! │                                                                         │
//! │  ✅ CORRECT: delta update evaluated by SQLite                          │
//! │     UPDATE products SET inventory = inventory - 3 WHERE id = ?         │
//! │                                                                         │
//! │  ✅ GUARDED: delta + admission test in one statement                   │
//! │     UPDATE products SET inventory = inventory - ?q                     │
//! │      WHERE id = ?p AND inventory > ?q                                  │
//! │     (0 rows affected = not enough stock at write time)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order placement uses the guarded form through [`try_decrement_on`] inside
//! its transaction. [`ProductRepository::decrement_inventory`] is the plain
//! delta; the table's `CHECK (inventory >= 0)` still refuses a negative
//! result.

use sqlx::{SqliteConnection, SqlitePool};
use std::time::Duration;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::retry::{read_with_retry, with_timeout};
use storefront_core::validation::{validate_new_product, validate_quantity};
use storefront_core::{NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let on_hand = repo.get_inventory(product_id).await?;
/// let product = repo.get_by_id(product_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        ProductRepository { pool, timeout }
    }

    /// Returns the units on hand for a product.
    ///
    /// A missing product reads as `0`. Callers that must tell "absent" from
    /// "out of stock" use [`get_by_id`](Self::get_by_id).
    pub async fn get_inventory(&self, product_id: i64) -> DbResult<i64> {
        let pool = &self.pool;

        let inventory = read_with_retry(self.timeout, "products.get_inventory", move || async move {
            let mut conn = pool.acquire().await?;
            inventory_on(&mut conn, product_id).await
        })
        .await?;

        Ok(inventory.unwrap_or(0))
    }

    /// Subtracts `quantity` from a product's inventory.
    ///
    /// No admission check is made here. A result below zero is refused by
    /// the schema and surfaces as [`DbError::CheckViolation`]. The quantity
    /// must still be positive: this never adds stock.
    ///
    /// ## Returns
    /// * `Ok(())` - Inventory updated
    /// * `Err(DbError::Validation)` - Quantity is zero or negative
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn decrement_inventory(&self, product_id: i64, quantity: i64) -> DbResult<()> {
        validate_quantity(quantity)?;

        debug!(product_id, quantity, "Decrementing inventory");

        let rows = with_timeout(self.timeout, "products.decrement_inventory", async {
            let result =
                sqlx::query("UPDATE products SET inventory = inventory - ?2 WHERE id = ?1")
                    .bind(product_id)
                    .bind(quantity)
                    .execute(&self.pool)
                    .await?;
            Ok(result.rows_affected())
        })
        .await?;

        if rows == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        Ok(())
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its assigned id
    /// * `Err(DbError::Validation)` - Blank name, negative stock or price
    /// * `Err(DbError::ForeignKeyViolation)` - Store doesn't exist
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        validate_new_product(product)?;

        debug!(store_id = product.store_id, name = %product.product_name, "Inserting product");

        let id = with_timeout(self.timeout, "products.insert", async {
            let result = sqlx::query(
                r#"
                INSERT INTO products (store_id, product_name, inventory, price_cents)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(product.store_id)
            .bind(&product.product_name)
            .bind(product.inventory)
            .bind(product.price_cents)
            .execute(&self.pool)
            .await?;
            Ok(result.last_insert_rowid())
        })
        .await?;

        Ok(Product {
            id,
            store_id: product.store_id,
            product_name: product.product_name.clone(),
            inventory: product.inventory,
            price_cents: product.price_cents,
        })
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let pool = &self.pool;

        read_with_retry(self.timeout, "products.get_by_id", move || async move {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, store_id, product_name, inventory, price_cents
                FROM products
                WHERE id = ?1
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await?;
            Ok(product)
        })
        .await
    }

    /// Counts total products (for diagnostics and the seed check).
    pub async fn count(&self) -> DbResult<i64> {
        let pool = &self.pool;

        read_with_retry(self.timeout, "products.count", move || async move {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
                .fetch_one(pool)
                .await?;
            Ok(count)
        })
        .await
    }
}

// =============================================================================
// Connection-level helpers (used inside transactions)
// =============================================================================

/// Reads a product's inventory on an existing connection.
pub(crate) async fn inventory_on(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> DbResult<Option<i64>> {
    let inventory: Option<i64> =
        sqlx::query_scalar("SELECT inventory FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(inventory)
}

/// Decrements inventory only if more than `quantity` units remain.
///
/// Returns `false` when no row qualified (missing product or not enough
/// stock); the caller tells those apart.
pub(crate) async fn try_decrement_on(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET inventory = inventory - ?2
        WHERE id = ?1 AND inventory > ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
