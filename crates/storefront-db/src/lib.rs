//! # storefront-db: Database Layer for Storefront
//!
//! This crate provides database access for Storefront.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  Presentation layer (order form, history pages)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   storefront-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐  ┌──────────────┐  ┌──────────────────────┐  │   │
//! │  │   │ OrderPlace-  │  │   Queries    │  │  Seed                │  │   │
//! │  │   │ ment         │  │  (query.rs)  │  │  (seed.rs)           │  │   │
//! │  │   └──────┬───────┘  └──────┬───────┘  └──────────┬───────────┘  │   │
//! │  │          │                 │                     │              │   │
//! │  │          ▼                 ▼                     ▼              │   │
//! │  │   ┌─────────────────────────────────────────────────────────┐  │   │
//! │  │   │  Repositories  ·  Database (pool.rs)  ·  Migrations     │  │   │
//! │  │   └─────────────────────────────────────────────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Environment-driven application config
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and stable error codes
//! - [`repository`] - Entity Store (store, product, customer, order)
//! - [`query`] - Read-only joined views
//! - [`placement`] - Order placement workflow
//! - [`seed`] - Reference data bootstrap
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{AppConfig, Database};
//!
//! let config = AppConfig::load()?;
//! let db = Database::open(&config).await?;
//!
//! let picker = db.queries().product_selection_list().await?;
//! let order = db.placement().place_order(picker[0].value, customer_id, 2).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod placement;
pub mod pool;
pub mod query;
pub mod repository;
pub mod seed;

mod retry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult, ErrorKind};
pub use placement::{OrderPlacement, PlacementError, PlacementState};
pub use pool::{Database, DbConfig};
pub use query::Queries;
pub use seed::SeedOutcome;

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::store::StoreRepository;
