//! Per-call timeout and the single read retry.
//!
//! ```text
//! read call ──► timeout(attempt 1) ──┬── Ok / permanent error ──► return
//!                                    │
//!                                    └── transient ──► warn! ──► timeout(attempt 2) ──► return
//! ```
//!
//! Writes only get the timeout. A write whose outcome is unknown is never
//! replayed here.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{DbError, DbResult};

/// Bounds one storage call by `limit`.
pub(crate) async fn with_timeout<T, Fut>(
    limit: Duration,
    operation: &'static str,
    call: Fut,
) -> DbResult<T>
where
    Fut: Future<Output = DbResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(DbError::Timeout {
            operation: operation.to_string(),
            after_ms: limit.as_millis() as u64,
        }),
    }
}

/// Runs a read-only call, retrying once immediately on a transient failure.
pub(crate) async fn read_with_retry<T, F, Fut>(
    limit: Duration,
    operation: &'static str,
    mut call: F,
) -> DbResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    match with_timeout(limit, operation, call()).await {
        Err(err) if err.is_transient() => {
            warn!(operation, error = %err, "Transient store error, retrying once");
            with_timeout(limit, operation, call()).await
        }
        result => result,
    }
}
