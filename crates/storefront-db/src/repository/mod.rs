//! # Repository Module
//!
//! Entity Store: single-table reads and writes for each entity.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Entity Store                                         │
//! │                                                                         │
//! │  OrderPlacement / Seed / callers                                       │
//! │       │                                                                 │
//! │       │  db.products().get_inventory(3)                                │
//! │       ▼                                                                 │
//! │  ┌──────────────┬──────────────┬──────────────┬──────────────┐         │
//! │  │ StoreRepo    │ ProductRepo  │ CustomerRepo │ OrderRepo    │         │
//! │  │ insert       │ get_inventory│ insert       │ insert       │         │
//! │  │ get_by_id    │ decrement_.. │ get_by_id    │ get_by_id    │         │
//! │  │ count        │ insert, ..   │ count        │ count        │         │
//! │  └──────────────┴──────────────┴──────────────┴──────────────┘         │
//! │       │                                                                 │
//! │       │  SQL Query (per-call timeout, reads retried once)              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Joined, read-only views live in [`crate::query`], not here.
//!
//! ## Available Repositories
//!
//! - [`store::StoreRepository`] - Store locations
//! - [`product::ProductRepository`] - Products and inventory
//! - [`customer::CustomerRepository`] - Customer registration
//! - [`order::OrderRepository`] - Order rows

pub mod customer;
pub mod order;
pub mod product;
pub mod store;
