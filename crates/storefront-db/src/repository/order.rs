//! # Order Repository
//!
//! Inserts and single-row reads for orders. Orders are never updated or
//! deleted once written.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use std::time::Duration;
use tracing::debug;

use crate::error::DbResult;
use crate::retry::{read_with_retry, with_timeout};
use storefront_core::validation::validate_quantity;
use storefront_core::{NewOrder, Order};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        OrderRepository { pool, timeout }
    }

    /// Inserts an order stamped with the current time.
    ///
    /// This does not touch inventory. Use
    /// [`OrderPlacement::place_order`](crate::placement::OrderPlacement::place_order)
    /// to take stock and record the order together.
    ///
    /// ## Returns
    /// * `Ok(Order)` - Persisted order with id and timestamp
    /// * `Err(DbError::ForeignKeyViolation)` - Product or customer missing
    pub async fn insert(&self, order: NewOrder) -> DbResult<Order> {
        validate_quantity(order.quantity)?;

        with_timeout(self.timeout, "orders.insert", async {
            let mut conn = self.pool.acquire().await?;
            insert_on(&mut conn, order).await
        })
        .await
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let pool = &self.pool;

        read_with_retry(self.timeout, "orders.get_by_id", move || async move {
            let order = sqlx::query_as::<_, Order>(
                r#"
                SELECT id, product_id, customer_id, quantity, timestamp
                FROM orders
                WHERE id = ?1
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await?;
            Ok(order)
        })
        .await
    }

    /// Counts orders.
    pub async fn count(&self) -> DbResult<i64> {
        let pool = &self.pool;

        read_with_retry(self.timeout, "orders.count", move || async move {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
                .fetch_one(pool)
                .await?;
            Ok(count)
        })
        .await
    }
}

/// Inserts an order on an existing connection (or transaction).
pub(crate) async fn insert_on(conn: &mut SqliteConnection, order: NewOrder) -> DbResult<Order> {
    let timestamp = Utc::now();

    debug!(
        product_id = order.product_id,
        customer_id = order.customer_id,
        quantity = order.quantity,
        "Inserting order"
    );

    let result = sqlx::query(
        r#"
        INSERT INTO orders (product_id, customer_id, quantity, timestamp)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(order.product_id)
    .bind(order.customer_id)
    .bind(order.quantity)
    .bind(timestamp)
    .execute(&mut *conn)
    .await?;

    Ok(Order {
        id: result.last_insert_rowid(),
        product_id: order.product_id,
        customer_id: order.customer_id,
        quantity: order.quantity,
        timestamp,
    })
}
