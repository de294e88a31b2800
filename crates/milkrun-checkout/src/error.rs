//! # Checkout Error Type
//!
//! Unified error type for the UI host.
//!
//! ## Serialization
//! This is what the frontend receives when checkout fails:
//! ```json
//! {
//!   "code": "NO_PAYMENT_METHOD",
//!   "message": "Please select a payment method"
//! }
//! ```
//!
//! Every variant carries a human-readable message ready for the host's
//! notification toast; the code exists for programmatic handling.

use serde::Serialize;

use milkrun_core::CoreError;
use milkrun_payments::PaymentError;

/// Checkout error returned to the UI host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for checkout responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Checkout invoked on an empty cart
    EmptyCart,

    /// No payment method chosen
    NoPaymentMethod,

    /// A payment attempt is already processing
    PaymentInFlight,

    /// The chosen gateway is toggled off or unregistered
    GatewayUnavailable,

    /// The gateway reported failure (declined, unreachable, timed out)
    PaymentFailed,

    /// Input validation failed (bad cadence, bad offer data)
    ValidationError,
}

impl CheckoutError {
    /// Creates a new checkout error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CheckoutError {
            code,
            message: message.into(),
        }
    }

    /// Checkout invoked with nothing in the cart.
    pub fn empty_cart() -> Self {
        CheckoutError::new(ErrorCode::EmptyCart, "Your cart is empty")
    }
}

/// Converts payment errors to checkout errors.
impl From<PaymentError> for CheckoutError {
    fn from(err: PaymentError) -> Self {
        let code = match &err {
            PaymentError::NoMethodSelected => ErrorCode::NoPaymentMethod,
            PaymentError::AttemptInFlight => ErrorCode::PaymentInFlight,
            PaymentError::GatewayUnavailable(_) => ErrorCode::GatewayUnavailable,
            PaymentError::Gateway(_) => ErrorCode::PaymentFailed,
        };
        CheckoutError::new(code, err.to_string())
    }
}

/// Converts core errors to checkout errors.
impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        CheckoutError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl std::fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CheckoutError {}

// =============================================================================
// Unit Tests
// =============================================================================
