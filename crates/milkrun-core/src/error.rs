//! # Error Types
//!
//! Domain-specific error types for milkrun-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  milkrun-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  milkrun-payments errors (separate crate)                              │
//! │  └── PaymentError     - Dispatch guards and gateway failures           │
//! │                                                                         │
//! │  milkrun-checkout errors (separate crate)                              │
//! │  └── CheckoutError    - What the UI host sees (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → Frontend          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (cadence label, line id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are rejected before
/// any state mutation and should be translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller attempted to select a cadence outside the closed set.
    #[error("Invalid subscription cadence: {0}")]
    InvalidCadence(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Malformed prices, quantities, and rates reaching the pricing engine would
/// indicate an upstream invariant violation, so they are rejected here at the
/// construction boundary instead of being silently tolerated.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a malformed percentage string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidCadence("fortnightly".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid subscription cadence: fortnightly"
        );

        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1200 exceeds maximum allowed (999)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
