//! # Query Layer
//!
//! Read-only joined views over orders, customers, products, and stores.
//!
//! ## Views
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Method                   Shape               Order                     │
//! │  ──────────────────────   ─────────────────   ───────────────────────   │
//! │  list_customers(filter)   Vec<Customer>       id                        │
//! │  customer_history(id)     Vec<OrderView>      timestamp, id             │
//! │  store_history(id)        Vec<OrderView>      timestamp, id             │
//! │  order_details(id)        OrderView           -                         │
//! │  all_orders()             Vec<OrderView>      timestamp, id             │
//! │  product_catalog()        Vec<ProductListing> store_id, id              │
//! │  product_selection_list() Vec<SelectionItem>  catalog order             │
//! │  customer_selection_list  Vec<SelectionItem>  id                        │
//! │  list_stores()            Vec<Store>          id                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is bounded by the query timeout and retried once on a
//! transient failure. Nothing here writes.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::retry::read_with_retry;
use storefront_core::{
    Customer, CustomerFilter, Order, OrderView, Product, ProductListing, SelectionItem, Store,
};

const ORDER_VIEW_SELECT: &str = r#"
    SELECT
        o.id AS order_id,
        o.product_id,
        o.customer_id,
        o.quantity,
        o.timestamp,
        c.first_name,
        c.last_name,
        c.user_name,
        c.password,
        p.store_id,
        p.product_name,
        p.inventory,
        p.price_cents,
        s.location
    FROM orders o
    INNER JOIN customers c ON c.id = o.customer_id
    INNER JOIN products p ON p.id = o.product_id
    INNER JOIN stores s ON s.id = p.store_id
"#;

const PRODUCT_LISTING_SELECT: &str = r#"
    SELECT
        p.id,
        p.store_id,
        p.product_name,
        p.inventory,
        p.price_cents,
        s.location
    FROM products p
    INNER JOIN stores s ON s.id = p.store_id
    ORDER BY p.store_id ASC, p.id ASC
"#;

/// Flat row for the four-way order join.
#[derive(Debug, sqlx::FromRow)]
struct OrderViewRow {
    order_id: i64,
    product_id: i64,
    customer_id: i64,
    quantity: i64,
    timestamp: DateTime<Utc>,
    first_name: String,
    last_name: String,
    user_name: String,
    password: String,
    store_id: i64,
    product_name: String,
    inventory: i64,
    price_cents: i64,
    location: String,
}

impl From<OrderViewRow> for OrderView {
    fn from(row: OrderViewRow) -> Self {
        OrderView {
            order: Order {
                id: row.order_id,
                product_id: row.product_id,
                customer_id: row.customer_id,
                quantity: row.quantity,
                timestamp: row.timestamp,
            },
            customer: Customer {
                id: row.customer_id,
                first_name: row.first_name,
                last_name: row.last_name,
                user_name: row.user_name,
                password: row.password,
            },
            product: Product {
                id: row.product_id,
                store_id: row.store_id,
                product_name: row.product_name,
                inventory: row.inventory,
                price_cents: row.price_cents,
            },
            store: Store {
                id: row.store_id,
                location: row.location,
            },
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductListingRow {
    id: i64,
    store_id: i64,
    product_name: String,
    inventory: i64,
    price_cents: i64,
    location: String,
}

impl From<ProductListingRow> for ProductListing {
    fn from(row: ProductListingRow) -> Self {
        ProductListing {
            product: Product {
                id: row.id,
                store_id: row.store_id,
                product_name: row.product_name,
                inventory: row.inventory,
                price_cents: row.price_cents,
            },
            store: Store {
                id: row.store_id,
                location: row.location,
            },
        }
    }
}

/// Read-only joined queries.
///
/// ## Usage
/// ```rust,ignore
/// let history = db.queries().customer_history(customer_id).await?;
/// for view in &history {
///     println!("{} x{} {}", view.product.product_name, view.order.quantity, view.line_total());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Queries {
    pool: SqlitePool,
    timeout: Duration,
}

impl Queries {
    /// Creates a new Queries handle.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Queries { pool, timeout }
    }

    /// Customers matching every present, non-empty filter.
    ///
    /// Matching is case-sensitive substring containment (`instr`), not
    /// `LIKE`, so `%` and `_` in a term are literal.
    pub async fn list_customers(&self, filter: &CustomerFilter) -> DbResult<Vec<Customer>> {
        let pool = &self.pool;
        let first = filter.first_name_term();
        let last = filter.last_name_term();
        let user = filter.user_name_term();

        let customers = read_with_retry(self.timeout, "list_customers", move || async move {
            let rows = sqlx::query_as::<_, Customer>(
                r#"
                SELECT id, first_name, last_name, user_name, password
                FROM customers
                WHERE (?1 IS NULL OR instr(first_name, ?1) > 0)
                  AND (?2 IS NULL OR instr(last_name, ?2) > 0)
                  AND (?3 IS NULL OR instr(user_name, ?3) > 0)
                ORDER BY id ASC
                "#,
            )
            .bind(first)
            .bind(last)
            .bind(user)
            .fetch_all(pool)
            .await?;
            Ok(rows)
        })
        .await?;

        debug!(count = customers.len(), "list_customers");
        Ok(customers)
    }

    /// Orders placed by one customer, oldest first.
    ///
    /// An unknown customer yields an empty list.
    pub async fn customer_history(&self, customer_id: i64) -> DbResult<Vec<OrderView>> {
        let views = self
            .order_views(
                "customer_history",
                "WHERE o.customer_id = ?1 ORDER BY o.timestamp ASC, o.id ASC",
                Some(customer_id),
            )
            .await?;

        debug!(customer_id, count = views.len(), "customer_history");
        Ok(views)
    }

    /// Order history for a store.
    ///
    /// The argument is matched against the order's **customer** id, not the
    /// product's store id. Existing callers depend on this, so it is kept;
    /// a caller wanting per-store orders should filter
    /// [`all_orders`](Self::all_orders) on `view.store.id`.
    pub async fn store_history(&self, store_id: i64) -> DbResult<Vec<OrderView>> {
        let views = self
            .order_views(
                "store_history",
                "WHERE o.customer_id = ?1 ORDER BY o.timestamp ASC, o.id ASC",
                Some(store_id),
            )
            .await?;

        debug!(store_id, count = views.len(), "store_history");
        Ok(views)
    }

    /// One order with its customer, product, and store.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such order
    pub async fn order_details(&self, order_id: i64) -> DbResult<OrderView> {
        self.order_views("order_details", "WHERE o.id = ?1", Some(order_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// Every order, oldest first.
    pub async fn all_orders(&self) -> DbResult<Vec<OrderView>> {
        let views = self
            .order_views("all_orders", "ORDER BY o.timestamp ASC, o.id ASC", None)
            .await?;

        debug!(count = views.len(), "all_orders");
        Ok(views)
    }

    /// Every product with its store, grouped by store.
    pub async fn product_catalog(&self) -> DbResult<Vec<ProductListing>> {
        let pool = &self.pool;

        let rows = read_with_retry(self.timeout, "product_catalog", move || async move {
            let rows = sqlx::query_as::<_, ProductListingRow>(PRODUCT_LISTING_SELECT)
                .fetch_all(pool)
                .await?;
            Ok(rows)
        })
        .await?;

        debug!(count = rows.len(), "product_catalog");
        Ok(rows.into_iter().map(ProductListing::from).collect())
    }

    /// Picker entries for the order form, in catalog order.
    ///
    /// Labels read `"<location> | <product> | Inventory: <n> @ $<price> each"`.
    pub async fn product_selection_list(&self) -> DbResult<Vec<SelectionItem>> {
        let catalog = self.product_catalog().await?;
        Ok(catalog.iter().map(ProductListing::selection_item).collect())
    }

    /// `(id, user_name)` picker entries for the order form.
    pub async fn customer_selection_list(&self) -> DbResult<Vec<SelectionItem>> {
        let pool = &self.pool;

        let rows = read_with_retry(self.timeout, "customer_selection_list", move || async move {
            let rows = sqlx::query_as::<_, (i64, String)>(
                "SELECT id, user_name FROM customers ORDER BY id ASC",
            )
            .fetch_all(pool)
            .await?;
            Ok(rows)
        })
        .await?;

        Ok(rows
            .into_iter()
            .map(|(value, label)| SelectionItem { value, label })
            .collect())
    }

    /// Every store ordered by id.
    pub async fn list_stores(&self) -> DbResult<Vec<Store>> {
        let pool = &self.pool;

        read_with_retry(self.timeout, "list_stores", move || async move {
            let stores = sqlx::query_as::<_, Store>("SELECT id, location FROM stores ORDER BY id ASC")
                .fetch_all(pool)
                .await?;
            Ok(stores)
        })
        .await
    }

    async fn order_views(
        &self,
        operation: &'static str,
        tail: &'static str,
        param: Option<i64>,
    ) -> DbResult<Vec<OrderView>> {
        let pool = &self.pool;
        let sql = format!("{ORDER_VIEW_SELECT} {tail}");
        let sql = sql.as_str();

        let rows = read_with_retry(self.timeout, operation, move || async move {
            let mut query = sqlx::query_as::<_, OrderViewRow>(sql);
            if let Some(id) = param {
                query = query.bind(id);
            }
            let rows = query.fetch_all(pool).await?;
            Ok(rows)
        })
        .await?;

        Ok(rows.into_iter().map(OrderView::from).collect())
    }
}
