//! # Customer Repository
//!
//! Customer registration and lookup.

use sqlx::SqlitePool;
use std::time::Duration;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::retry::{read_with_retry, with_timeout};
use storefront_core::validation::validate_new_customer;
use storefront_core::{Customer, NewCustomer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        CustomerRepository { pool, timeout }
    }

    /// Registers a customer.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - Stored customer with its assigned id
    /// * `Err(DbError::Validation)` - A field broke the registration rules
    /// * `Err(DbError::UniqueViolation)` - User name already taken
    pub async fn insert(&self, customer: &NewCustomer) -> DbResult<Customer> {
        validate_new_customer(customer)?;

        debug!(user_name = %customer.user_name, "Registering customer");

        let id = with_timeout(self.timeout, "customers.insert", async {
            let result = sqlx::query(
                r#"
                INSERT INTO customers (first_name, last_name, user_name, password)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.user_name)
            .bind(&customer.password)
            .execute(&self.pool)
            .await?;
            Ok(result.last_insert_rowid())
        })
        .await
        .map_err(|err| match err {
            DbError::UniqueViolation { .. } => DbError::duplicate("user_name", &customer.user_name),
            other => other,
        })?;

        Ok(Customer {
            id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            user_name: customer.user_name.clone(),
            password: customer.password.clone(),
        })
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let pool = &self.pool;

        read_with_retry(self.timeout, "customers.get_by_id", move || async move {
            let customer = sqlx::query_as::<_, Customer>(
                r#"
                SELECT id, first_name, last_name, user_name, password
                FROM customers
                WHERE id = ?1
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await?;
            Ok(customer)
        })
        .await
    }

    /// Counts registered customers.
    pub async fn count(&self) -> DbResult<i64> {
        let pool = &self.pool;

        read_with_retry(self.timeout, "customers.count", move || async move {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
                .fetch_one(pool)
                .await?;
            Ok(count)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn michael() -> NewCustomer {
        NewCustomer {
            first_name: "Michael".to_string(),
            last_name: "Hall".to_string(),
            user_name: "mbhall".to_string(),
            password: "password1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_fetch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let stored = db.customers().insert(&michael()).await.unwrap();
        let fetched = db.customers().get_by_id(stored.id).await.unwrap();

        assert_eq!(fetched, Some(stored));
    }

    #[tokio::test]
    async fn test_duplicate_user_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers().insert(&michael()).await.unwrap();

        let again = NewCustomer {
            first_name: "Mike".to_string(),
            ..michael()
        };
        let err = db.customers().insert(&again).await.unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "user_name");
                assert_eq!(value, "mbhall");
            }
            other => panic!("expected unique violation, got {other:?}"),
        }
        assert_eq!(db.customers().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_registration_never_reaches_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let bad = NewCustomer {
            password: "short".to_string(),
            ..michael()
        };
        let err = db.customers().insert(&bad).await.unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.customers().count().await.unwrap(), 0);
    }
}
