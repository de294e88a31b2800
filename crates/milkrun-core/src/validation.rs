//! # Validation Module
//!
//! Boundary validation for values entering the pricing core.
//!
//! The catalog and UI layers sit upstream of this crate; anything they hand
//! us is checked once, here, so the engine itself can assume its invariants
//! hold (quantity ≥ 1, prices non-negative, rates ≤ 100%).

use crate::error::ValidationError;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in rupees.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (promotional free items)
pub fn validate_price(rupees: i64) -> ValidationResult<()> {
    if rupees < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty or whitespace
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines).
///
/// ## Rules
/// - Must not exceed MAX_CART_LINES (100)
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
