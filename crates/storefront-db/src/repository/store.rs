//! # Store Repository
//!
//! Database operations for store locations.

use sqlx::SqlitePool;
use std::time::Duration;
use tracing::debug;

use crate::error::DbResult;
use crate::retry::{read_with_retry, with_timeout};
use storefront_core::validation::validate_location;
use storefront_core::Store;

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        StoreRepository { pool, timeout }
    }

    /// Inserts a store and returns it with its assigned id.
    pub async fn insert(&self, location: &str) -> DbResult<Store> {
        validate_location(location)?;

        debug!(location = %location, "Inserting store");

        let id = with_timeout(self.timeout, "stores.insert", async {
            let result = sqlx::query("INSERT INTO stores (location) VALUES (?1)")
                .bind(location)
                .execute(&self.pool)
                .await?;
            Ok(result.last_insert_rowid())
        })
        .await?;

        Ok(Store {
            id,
            location: location.to_string(),
        })
    }

    /// Gets a store by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Store))` - Store found
    /// * `Ok(None)` - Store not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Store>> {
        let pool = &self.pool;

        read_with_retry(self.timeout, "stores.get_by_id", move || async move {
            let store =
                sqlx::query_as::<_, Store>("SELECT id, location FROM stores WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
            Ok(store)
        })
        .await
    }

    /// Counts stores.
    pub async fn count(&self) -> DbResult<i64> {
        let pool = &self.pool;

        read_with_retry(self.timeout, "stores.count", move || async move {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
                .fetch_one(pool)
                .await?;
            Ok(count)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stores();

        let austin = repo.insert("Austin").await.unwrap();
        let boston = repo.insert("Boston").await.unwrap();
        assert!(boston.id > austin.id);

        let stores = db.queries().list_stores().await.unwrap();
        assert_eq!(stores, vec![austin.clone(), boston]);

        assert_eq!(repo.get_by_id(austin.id).await.unwrap(), Some(austin));
        assert_eq!(repo.get_by_id(999).await.unwrap(), None);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_blank_location_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.stores().insert("   ").await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.stores().count().await.unwrap(), 0);
    }
}
