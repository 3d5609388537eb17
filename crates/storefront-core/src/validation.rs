//! # Validation Module
//!
//! Input validation for Storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (external)                                      │
//! │  └── Form binding, immediate feedback                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── quantity must be positive                                         │
//! │  └── customer registration field rules                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (inventory >= 0), CHECK (quantity > 0)                      │
//! │  ├── UNIQUE (user_name)                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_person_name, validate_quantity};
//!
//! assert!(validate_quantity(3).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_person_name("first_name", "Michael").is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{NewCustomer, NewProduct};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 20;
const USER_NAME_MIN: usize = 3;
const USER_NAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 30;
const PRODUCT_NAME_MAX: usize = 200;
const LOCATION_MAX: usize = 100;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Order Workflow
/// ```text
/// place_order(product, customer, qty)
///      │
///      ▼
/// validate_quantity(qty) ← THIS FUNCTION
///      │
///      ├── qty <= 0? → ValidationError, nothing touched
///      │
///      └── OK → Inventory Guard
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed.
pub fn validate_inventory(inventory: i64) -> ValidationResult<()> {
    if inventory < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "inventory".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(650).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a first or last name.
///
/// ## Rules
/// - 2 to 20 characters
/// - Starts with an uppercase ASCII letter
/// - ASCII letters only
pub fn validate_person_name(field: &str, name: &str) -> ValidationResult<()> {
    check_length(field, name, NAME_MIN, NAME_MAX)?;

    let mut chars = name.chars();
    let starts_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());

    if !starts_upper || !chars.all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must start with a capital letter and contain only letters".to_string(),
        });
    }

    Ok(())
}

/// Validates a user name.
///
/// ## Rules
/// - 3 to 20 characters
/// - Letters, digits, `.` and `_` only
/// - Must not start with `.` or `_`
/// - No `.`/`_` directly after another `.`/`_`
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_user_name;
///
/// assert!(validate_user_name("mb.hall_7").is_ok());
/// assert!(validate_user_name("_mbhall").is_err());
/// assert!(validate_user_name("mb..hall").is_err());
/// ```
pub fn validate_user_name(user_name: &str) -> ValidationResult<()> {
    check_length("user_name", user_name, USER_NAME_MIN, USER_NAME_MAX)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "user_name".to_string(),
        reason: reason.to_string(),
    };
    let is_separator = |c: char| c == '.' || c == '_';

    if !user_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || is_separator(c))
    {
        return Err(invalid("must contain only letters, numbers, '.' and '_'"));
    }

    if user_name.starts_with(is_separator) {
        return Err(invalid("must not start with '.' or '_'"));
    }

    let doubled = user_name
        .as_bytes()
        .windows(2)
        .any(|w| is_separator(w[0] as char) && is_separator(w[1] as char));
    if doubled {
        return Err(invalid("must not contain consecutive '.' or '_'"));
    }

    Ok(())
}

/// Validates a password: 8 to 30 characters.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    check_length("password", password, PASSWORD_MIN, PASSWORD_MAX)
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    check_length("product_name", name.trim(), 1, PRODUCT_NAME_MAX)
}

/// Validates a store location: non-empty, at most 100 characters.
pub fn validate_location(location: &str) -> ValidationResult<()> {
    check_length("location", location.trim(), 1, LOCATION_MAX)
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of a customer registration.
pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_person_name("first_name", &customer.first_name)?;
    validate_person_name("last_name", &customer.last_name)?;
    validate_user_name(&customer.user_name)?;
    validate_password(&customer.password)?;
    Ok(())
}

/// Validates every field of a new product.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.product_name)?;
    validate_inventory(product.inventory)?;
    validate_price_cents(product.price_cents)?;
    Ok(())
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.chars().count();

    if len == 0 {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_inventory_and_price() {
        assert!(validate_inventory(0).is_ok());
        assert!(validate_inventory(-1).is_err());
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_person_name() {
        assert!(validate_person_name("first_name", "Mike").is_ok());
        assert!(validate_person_name("first_name", "Al").is_ok());

        assert!(validate_person_name("first_name", "").is_err());
        assert!(validate_person_name("first_name", "M").is_err());
        assert!(validate_person_name("first_name", "mike").is_err());
        assert!(validate_person_name("first_name", "4after").is_err());
        assert!(validate_person_name("first_name", "After@dark").is_err());
        assert!(validate_person_name("first_name", &"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_user_name() {
        assert!(validate_user_name("72838meah").is_ok());
        assert!(validate_user_name("pie").is_ok());
        assert!(validate_user_name("mb_hall.").is_ok());

        assert!(validate_user_name("pi").is_err());
        assert!(validate_user_name("pie@2019withme").is_err());
        assert!(validate_user_name(".pie").is_err());
        assert!(validate_user_name("pi__e").is_err());
        assert!(validate_user_name("pi._e").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter22").is_ok());
        assert!(matches!(
            validate_password("yes"),
            Err(ValidationError::TooShort { min: 8, .. })
        ));
        assert!(validate_password(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_new_customer_reports_first_failure() {
        let customer = NewCustomer {
            first_name: "Michael".to_string(),
            last_name: "hall".to_string(),
            user_name: "mbhall".to_string(),
            password: "password1".to_string(),
        };
        let err = validate_new_customer(&customer).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "last_name"));
    }

    #[test]
    fn test_validate_new_product() {
        let product = NewProduct {
            store_id: 1,
            product_name: "Soap".to_string(),
            inventory: 0,
            price_cents: 200,
        };
        assert!(validate_new_product(&product).is_ok());

        let blank = NewProduct {
            product_name: "  ".to_string(),
            ..product
        };
        assert!(validate_new_product(&blank).is_err());
    }
}
