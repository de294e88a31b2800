//! # Gateway Contracts
//!
//! Payment methods, gateway availability, and the async contracts external
//! payment collaborators must satisfy.
//!
//! ## Availability Gating
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Admin toggles (external config)        Storefront payment picker       │
//! │  ──────────────────────────────         ─────────────────────────       │
//! │                                                                         │
//! │  razorpay: on/off  ─────┐                                               │
//! │                         ├──► GatewayDirectory ──► { razorpay, phonepe } │
//! │  phonepe:  on/off  ─────┘          │                                    │
//! │                                    │ fetch fails?                       │
//! │                                    ▼                                    │
//! │                         all gateways off, cash on delivery remains      │
//! │                                                                         │
//! │  Cash on delivery is ALWAYS available and never part of the             │
//! │  directory's answer.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use milkrun_core::Money;

use crate::error::GatewayError;

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
///
/// A closed, availability-gated set: the two gateways are toggled from the
/// admin console; cash on delivery is always offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Razorpay gateway (toggle-controlled).
    Razorpay,
    /// PhonePe gateway (toggle-controlled).
    PhonePe,
    /// Cash handed to the delivery agent; no gateway involved.
    #[serde(rename = "cod")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Whether settling this method requires a gateway round-trip.
    #[inline]
    pub const fn requires_gateway(&self) -> bool {
        !matches!(self, PaymentMethod::CashOnDelivery)
    }

    /// The storefront option id for this method.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Razorpay => "razorpay",
            PaymentMethod::PhonePe => "phonepe",
            PaymentMethod::CashOnDelivery => "cod",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses storefront option ids (`"razorpay"`, `"phonepe"`, `"cod"`).
impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "razorpay" => Ok(PaymentMethod::Razorpay),
            "phonepe" => Ok(PaymentMethod::PhonePe),
            "cod" | "cash-on-delivery" => Ok(PaymentMethod::CashOnDelivery),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

// =============================================================================
// Gateway Availability
// =============================================================================

/// Which gateways the admin console currently has switched on.
///
/// Cash on delivery is implicitly always available and deliberately absent
/// here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayAvailability {
    pub razorpay: bool,
    pub phonepe: bool,
}

impl GatewayAvailability {
    /// No gateways switched on; cash on delivery only.
    pub const fn none() -> Self {
        GatewayAvailability {
            razorpay: false,
            phonepe: false,
        }
    }

    /// Whether the given method can currently be dispatched.
    pub const fn is_available(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Razorpay => self.razorpay,
            PaymentMethod::PhonePe => self.phonepe,
            PaymentMethod::CashOnDelivery => true,
        }
    }

    /// The method the storefront preselects: first available gateway,
    /// falling back to cash on delivery.
    pub const fn default_method(&self) -> PaymentMethod {
        if self.razorpay {
            PaymentMethod::Razorpay
        } else if self.phonepe {
            PaymentMethod::PhonePe
        } else {
            PaymentMethod::CashOnDelivery
        }
    }
}

// =============================================================================
// External Contracts
// =============================================================================

/// Supplies the current gateway toggles.
///
/// Implemented over whatever the admin settings live in (an HTTP call in
/// production, a static value in tests).
#[async_trait]
pub trait GatewayDirectory: Send + Sync {
    async fn available_gateways(&self) -> Result<GatewayAvailability, GatewayError>;
}

/// One payment gateway backend.
///
/// The future must resolve **exactly once** with either an opaque payment
/// reference or a failure; the dispatcher adds the deadline on top.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate(&self, amount: Money, order_id: &str) -> Result<String, GatewayError>;
}

/// Fetches availability, degrading gracefully: a directory that cannot be
/// reached means "no gateways", never a crashed checkout.
pub async fn fetch_availability(directory: &dyn GatewayDirectory) -> GatewayAvailability {
    match directory.available_gateways().await {
        Ok(availability) => availability,
        Err(err) => {
            warn!(error = %err, "gateway directory unavailable, falling back to cash on delivery");
            GatewayAvailability::none()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{StaticDirectory, UnreachableDirectory};

    #[test]
    fn test_method_labels_round_trip() {
        for method in [
            PaymentMethod::Razorpay,
            PaymentMethod::PhonePe,
            PaymentMethod::CashOnDelivery,
        ] {
            assert_eq!(method.label().parse::<PaymentMethod>().unwrap(), method);
        }

        assert!("paytm".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_cash_on_delivery_always_available() {
        assert!(GatewayAvailability::none().is_available(PaymentMethod::CashOnDelivery));
        assert!(!GatewayAvailability::none().is_available(PaymentMethod::Razorpay));
        assert!(!GatewayAvailability::none().is_available(PaymentMethod::PhonePe));
    }

    #[test]
    fn test_default_method_prefers_first_available_gateway() {
        let both = GatewayAvailability {
            razorpay: true,
            phonepe: true,
        };
        assert_eq!(both.default_method(), PaymentMethod::Razorpay);

        let phonepe_only = GatewayAvailability {
            razorpay: false,
            phonepe: true,
        };
        assert_eq!(phonepe_only.default_method(), PaymentMethod::PhonePe);

        assert_eq!(
            GatewayAvailability::none().default_method(),
            PaymentMethod::CashOnDelivery
        );
    }

    #[tokio::test]
    async fn test_fetch_availability_passes_through() {
        let directory = StaticDirectory::new(true, false);
        let availability = fetch_availability(&directory).await;

        assert!(availability.razorpay);
        assert!(!availability.phonepe);
    }

    #[tokio::test]
    async fn test_fetch_availability_degrades_to_cash_only() {
        let directory = UnreachableDirectory;
        let availability = fetch_availability(&directory).await;

        assert_eq!(availability, GatewayAvailability::none());
        assert_eq!(availability.default_method(), PaymentMethod::CashOnDelivery);
    }
}
