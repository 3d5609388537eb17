//! # Inventory Guard
//!
//! The admission rule for order quantities against current stock.
//!
//! ## Boundary
//! ```text
//! available = 20
//!
//!   requested 10  ──► admitted   (20 > 10)
//!   requested 20  ──► rejected   (20 > 20 is false)
//!   requested 30  ──► rejected
//! ```
//!
//! The comparison is strict: an order for exactly the remaining stock is
//! rejected, so a product can never be sold down to zero through order
//! placement. The conditional decrement in storefront-db applies the same
//! predicate in SQL (`inventory > ?`); keep the two in step.

use crate::error::{CoreError, CoreResult};

/// Returns true iff `requested` units can be taken from `available` stock.
///
/// ## Example
/// ```rust
/// use storefront_core::inventory::can_fulfill;
///
/// assert!(can_fulfill(20, 10));
/// assert!(!can_fulfill(20, 20));
/// assert!(!can_fulfill(20, 30));
/// ```
#[inline]
pub const fn can_fulfill(available: i64, requested: i64) -> bool {
    available > requested
}

/// Applies [`can_fulfill`] and turns a rejection into
/// [`CoreError::InsufficientInventory`].
pub fn check_fulfillable(product_id: i64, available: i64, requested: i64) -> CoreResult<()> {
    if can_fulfill(available, requested) {
        Ok(())
    } else {
        Err(CoreError::InsufficientInventory {
            product_id,
            available,
            requested,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
