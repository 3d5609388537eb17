//! # Order Placement
//!
//! The one write workflow: take stock from a product and record the order,
//! atomically.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    place_order(product, customer, qty)                  │
//! │                                                                         │
//! │  validate_quantity(qty)                                                │
//! │       │  qty <= 0 ───────────────────────────────► Rejected (Validation)│
//! │       ▼                                                                 │
//! │  Validated                                                             │
//! │       │  read inventory                                                │
//! │       │  product missing ────────────────────────► Rejected (NotFound)  │
//! │       │  !can_fulfill(available, qty) ───────────► Rejected (Insuff.)   │
//! │       ▼                                                                 │
//! │  InventoryChecked                                                      │
//! │       │                                                                 │
//! │       │  BEGIN                                                          │
//! │       │    UPDATE products SET inventory = inventory - qty             │
//! │       │     WHERE id = ? AND inventory > qty                           │
//! │       │      0 rows ─── (another order got there first) ─► Rejected    │
//! │       │    INSERT INTO orders (..., timestamp = now)                   │
//! │       │      FK failure ─── rollback ───────────► Rejected (RefInteg.)  │
//! │       │  COMMIT                                                         │
//! │       ▼                                                                 │
//! │  Committed → Order                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The early inventory check only spares a write lock for requests that
//! cannot succeed. The conditional UPDATE is what holds the line under
//! concurrency: it applies the same strict rule as the guard at the moment
//! the row is locked, so inventory never goes negative.
//!
//! The transaction's first statement is the write, so concurrent placements
//! queue on SQLite's write lock (up to the busy timeout) instead of failing
//! on a stale read snapshot.

use serde::Serialize;
use sqlx::SqlitePool;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::error::{DbError, ErrorKind};
use crate::repository::order::insert_on;
use crate::repository::product::{inventory_on, try_decrement_on};
use crate::retry::with_timeout;
use storefront_core::inventory::check_fulfillable;
use storefront_core::validation::validate_quantity;
use storefront_core::{CoreError, NewOrder, Order, ValidationError};

// =============================================================================
// Errors
// =============================================================================

/// Everything `place_order` can return instead of an order.
///
/// `Validation` and `InsufficientInventory` are expected business outcomes
/// for the presentation layer to render. The rest are failures.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Insufficient inventory for product {product_id}: available {available}, requested {requested}")]
    InsufficientInventory {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    #[error(transparent)]
    Store(DbError),
}

impl PlacementError {
    /// The stable error code for this outcome.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlacementError::Validation(_) => ErrorKind::ValidationError,
            PlacementError::InsufficientInventory { .. } => ErrorKind::InsufficientInventory,
            PlacementError::NotFound { .. } => ErrorKind::NotFound,
            PlacementError::ReferentialIntegrity(_) => ErrorKind::ReferentialIntegrity,
            PlacementError::Store(err) => err.kind(),
        }
    }
}

impl From<CoreError> for PlacementError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientInventory {
                product_id,
                available,
                requested,
            } => PlacementError::InsufficientInventory {
                product_id,
                available,
                requested,
            },
            CoreError::Validation(err) => PlacementError::Validation(err),
        }
    }
}

impl From<DbError> for PlacementError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Validation(err) => PlacementError::Validation(err),
            DbError::NotFound { entity, id } => PlacementError::NotFound { entity, id },
            DbError::ForeignKeyViolation { message } => PlacementError::ReferentialIntegrity(message),
            other => PlacementError::Store(other),
        }
    }
}

// =============================================================================
// States
// =============================================================================

/// Lifecycle of one placement request, as recorded in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementState {
    Validated,
    InventoryChecked,
    Committed,
    Rejected,
}

impl PlacementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementState::Validated => "validated",
            PlacementState::InventoryChecked => "inventory_checked",
            PlacementState::Committed => "committed",
            PlacementState::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PlacementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum CommitOutcome {
    Placed(Order),
    /// The conditional decrement matched no row and the product still exists.
    Outrun { available: i64 },
    /// The product disappeared between the check and the write.
    ProductGone,
}

// =============================================================================
// Service
// =============================================================================

/// Order placement service.
///
/// ## Usage
/// ```rust,ignore
/// match db.placement().place_order(product_id, customer_id, 3).await {
///     Ok(order) => render_confirmation(order),
///     Err(err) if err.kind().is_expected_outcome() => rerender_form(err),
///     Err(err) => return Err(err.into()),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OrderPlacement {
    pool: SqlitePool,
    timeout: Duration,
}

impl OrderPlacement {
    /// Creates a new OrderPlacement service.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        OrderPlacement { pool, timeout }
    }

    /// Places an order for `quantity` units of a product.
    ///
    /// On success the product's inventory has dropped by exactly
    /// `quantity` and the returned order is persisted with the store's
    /// timestamp. On any error nothing has changed.
    ///
    /// Never retried internally: a [`PlacementError::Store`] with a
    /// transient kind means the caller may resubmit.
    pub async fn place_order(
        &self,
        product_id: i64,
        customer_id: i64,
        quantity: i64,
    ) -> Result<Order, PlacementError> {
        let request = NewOrder {
            product_id,
            customer_id,
            quantity,
        };

        if let Err(err) = validate_quantity(quantity) {
            debug!(
                product_id,
                customer_id,
                quantity,
                state = %PlacementState::Rejected,
                reason = %err,
                "Order rejected"
            );
            return Err(err.into());
        }

        debug!(product_id, customer_id, quantity, state = %PlacementState::Validated, "Order validated");

        let result = self.check_and_commit(request).await;

        match &result {
            Ok(order) => info!(
                order_id = order.id,
                product_id,
                customer_id,
                quantity,
                state = %PlacementState::Committed,
                "Order placed"
            ),
            Err(err) if err.kind().is_expected_outcome() => debug!(
                product_id,
                customer_id,
                quantity,
                state = %PlacementState::Rejected,
                reason = %err,
                "Order rejected"
            ),
            Err(err @ (PlacementError::NotFound { .. } | PlacementError::ReferentialIntegrity(_))) => {
                info!(
                    product_id,
                    customer_id,
                    quantity,
                    state = %PlacementState::Rejected,
                    reason = %err,
                    "Order rejected"
                )
            }
            Err(err) => error!(
                product_id,
                customer_id,
                quantity,
                state = %PlacementState::Rejected,
                kind = ?err.kind(),
                error = %err,
                "Order placement failed"
            ),
        }

        result
    }

    async fn check_and_commit(&self, request: NewOrder) -> Result<Order, PlacementError> {
        let available = self.read_inventory(request.product_id).await?;

        check_fulfillable(request.product_id, available, request.quantity)?;

        debug!(
            product_id = request.product_id,
            available,
            requested = request.quantity,
            state = %PlacementState::InventoryChecked,
            "Inventory checked"
        );

        let outcome = with_timeout(self.timeout, "place_order", self.commit(request)).await?;

        match outcome {
            CommitOutcome::Placed(order) => Ok(order),
            CommitOutcome::Outrun { available } => Err(PlacementError::InsufficientInventory {
                product_id: request.product_id,
                available,
                requested: request.quantity,
            }),
            CommitOutcome::ProductGone => Err(PlacementError::NotFound {
                entity: "Product".to_string(),
                id: request.product_id.to_string(),
            }),
        }
    }

    async fn read_inventory(&self, product_id: i64) -> Result<i64, PlacementError> {
        let inventory = with_timeout(self.timeout, "place_order.read_inventory", async {
            let mut conn = self.pool.acquire().await?;
            inventory_on(&mut conn, product_id).await
        })
        .await?;

        inventory.ok_or_else(|| PlacementError::NotFound {
            entity: "Product".to_string(),
            id: product_id.to_string(),
        })
    }

    /// Decrement and insert in one transaction.
    ///
    /// Every early return drops `tx`, which rolls back.
    async fn commit(&self, request: NewOrder) -> Result<CommitOutcome, DbError> {
        let mut tx = self.pool.begin().await?;

        if !try_decrement_on(&mut *tx, request.product_id, request.quantity).await? {
            let outcome = match inventory_on(&mut *tx, request.product_id).await? {
                Some(available) => CommitOutcome::Outrun { available },
                None => CommitOutcome::ProductGone,
            };
            return Ok(outcome);
        }

        let order = insert_on(&mut *tx, request).await?;

        tx.commit().await?;

        Ok(CommitOutcome::Placed(order))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
