//! # Payment Error Types
//!
//! Guard failures and gateway failures are kept distinct: guards
//! (`NoMethodSelected`, `AttemptInFlight`, `GatewayUnavailable`) block the
//! attempt before anything leaves the process, while `Gateway` wraps what an
//! actual gateway round-trip reported. All of them are recoverable - the
//! session survives, the cart is never cleared on a payment error.

use thiserror::Error;

use crate::gateway::PaymentMethod;

// =============================================================================
// Gateway Error
// =============================================================================

/// What a gateway round-trip can report back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The gateway processed the request and declined it.
    #[error("Payment declined: {detail}")]
    Declined { detail: String },

    /// The gateway could not be reached at all.
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),

    /// The gateway accepted the request but never resolved it within the
    /// allowed window.
    #[error("Gateway did not respond in time")]
    TimedOut,
}

// =============================================================================
// Payment Error
// =============================================================================

/// Errors surfaced by the payment dispatcher.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Checkout was invoked with no payment method chosen. No state
    /// transition happens; the user is asked to pick one.
    #[error("Please select a payment method")]
    NoMethodSelected,

    /// A checkout attempt is already processing for this session.
    /// Re-entrant invocations are rejected, never queued.
    #[error("A payment is already being processed")]
    AttemptInFlight,

    /// The chosen gateway is disabled (or unregistered) right now.
    #[error("Payment method {0} is currently unavailable")]
    GatewayUnavailable(PaymentMethod),

    /// The gateway round-trip failed; the user may retry.
    #[error("Payment failed: {0}")]
    Gateway(#[from] GatewayError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PaymentError.
pub type PaymentResult<T> = Result<T, PaymentError>;

// =============================================================================
// Unit Tests
// =============================================================================
