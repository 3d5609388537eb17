//! # Domain Types
//!
//! Core domain types used throughout Storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Store       │   │    Product      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  store_id (FK)  │◄──│  product_id(FK) │       │
//! │  │  location       │   │  product_name   │   │  customer_id(FK)│──┐    │
//! │  └─────────────────┘   │  inventory      │   │  quantity       │  │    │
//! │                        │  price_cents    │   │  timestamp      │  │    │
//! │                        └─────────────────┘   └─────────────────┘  │    │
//! │                                                                   │    │
//! │  ┌─────────────────┐                                              │    │
//! │  │    Customer     │◄─────────────────────────────────────────────┘    │
//! │  │  ─────────────  │                                                   │
//! │  │  id, names,     │   Joined read shapes:                             │
//! │  │  user_name,     │   OrderView      = Order + Customer + Product +   │
//! │  │  password       │                    Store                          │
//! │  └─────────────────┘   ProductListing = Product + Store                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are integer row ids assigned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Store
// =============================================================================

/// A physical store location. Owns zero or more products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Store {
    pub id: i64,
    pub location: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product stocked by exactly one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Owning store.
    pub store_id: i64,

    pub product_name: String,

    /// Units on hand. Never negative after a committed mutation.
    pub inventory: i64,

    /// Unit price in cents.
    pub price_cents: i64,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub store_id: i64,
    pub product_name: String,
    pub inventory: i64,
    pub price_cents: i64,
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    /// Stored as entered.
    pub password: String,
}

/// Input for registering a customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub password: String,
}

/// Substring filters for the customer search.
///
/// Every present, non-empty filter must match (logical AND). Matching is
/// case-sensitive containment.
///
/// ## Example
/// ```rust
/// use storefront_core::CustomerFilter;
///
/// let filter = CustomerFilter::default().first_name("Mi").user_name("hall");
/// assert_eq!(filter.first_name_term(), Some("Mi"));
/// assert_eq!(filter.last_name_term(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

impl CustomerFilter {
    /// Sets the first-name filter.
    pub fn first_name(mut self, term: impl Into<String>) -> Self {
        self.first_name = Some(term.into());
        self
    }

    /// Sets the last-name filter.
    pub fn last_name(mut self, term: impl Into<String>) -> Self {
        self.last_name = Some(term.into());
        self
    }

    /// Sets the user-name filter.
    pub fn user_name(mut self, term: impl Into<String>) -> Self {
        self.user_name = Some(term.into());
        self
    }

    /// First-name term, if it should be applied.
    pub fn first_name_term(&self) -> Option<&str> {
        active_term(&self.first_name)
    }

    /// Last-name term, if it should be applied.
    pub fn last_name_term(&self) -> Option<&str> {
        active_term(&self.last_name)
    }

    /// User-name term, if it should be applied.
    pub fn user_name_term(&self) -> Option<&str> {
        active_term(&self.user_name)
    }

    /// Checks whether a customer satisfies every active filter.
    pub fn matches(&self, customer: &Customer) -> bool {
        let contains = |term: Option<&str>, value: &str| term.map_or(true, |t| value.contains(t));

        contains(self.first_name_term(), &customer.first_name)
            && contains(self.last_name_term(), &customer.last_name)
            && contains(self.user_name_term(), &customer.user_name)
    }
}

// An empty string is the same as "no filter".
fn active_term(term: &Option<String>) -> Option<&str> {
    term.as_deref().filter(|t| !t.is_empty())
}

// =============================================================================
// Order
// =============================================================================

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub quantity: i64,

    /// Assigned by the store when the order is inserted.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

/// Input for inserting an order.
///
/// Has no timestamp field; the store assigns creation time on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub product_id: i64,
    pub customer_id: i64,
    pub quantity: i64,
}

// =============================================================================
// Joined Views
// =============================================================================

/// An order with its customer, product, and the product's store.
///
/// Used by the history, details, and all-orders views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderView {
    pub order: Order,
    pub customer: Customer,
    pub product: Product,
    pub store: Store,
}

impl OrderView {
    /// Unit price × quantity at today's product price, saturating on overflow.
    pub fn line_total(&self) -> Money {
        self.product.price().multiply_quantity(self.order.quantity)
    }
}

/// A product with its store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductListing {
    pub product: Product,
    pub store: Store,
}

impl ProductListing {
    /// Label shown in the order form's product picker.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::{Product, ProductListing, Store};
    ///
    /// let listing = ProductListing {
    ///     product: Product {
    ///         id: 1,
    ///         store_id: 1,
    ///         product_name: "Shampoo".to_string(),
    ///         inventory: 30,
    ///         price_cents: 650,
    ///     },
    ///     store: Store { id: 1, location: "New York".to_string() },
    /// };
    /// assert_eq!(
    ///     listing.selection_label(),
    ///     "New York | Shampoo | Inventory: 30 @ $6.50 each"
    /// );
    /// ```
    pub fn selection_label(&self) -> String {
        format!(
            "{} | {} | Inventory: {} @ {} each",
            self.store.location,
            self.product.product_name,
            self.product.inventory,
            self.product.price()
        )
    }

    /// The picker entry for this listing.
    pub fn selection_item(&self) -> SelectionItem {
        SelectionItem {
            value: self.product.id,
            label: self.selection_label(),
        }
    }
}

/// A `(value, label)` pair for a choice control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectionItem {
    pub value: i64,
    pub label: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
