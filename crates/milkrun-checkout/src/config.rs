//! # Checkout Configuration
//!
//! Per-deployment knobs for the checkout layer.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`MILKRUN_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after initialization, so no locking is needed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use milkrun_core::{Money, DELIVERY_FEE};
use milkrun_payments::DEFAULT_GATEWAY_TIMEOUT;

/// Checkout layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfig {
    /// Flat delivery fee charged per order.
    pub delivery_fee: Money,

    /// Deadline for a gateway round-trip, in seconds.
    pub gateway_timeout_secs: u64,

    /// Currency symbol for log/display formatting.
    pub currency_symbol: String,
}

impl Default for CheckoutConfig {
    /// Returns defaults matching the storefront: ₹15 delivery, 30s gateway
    /// deadline.
    fn default() -> Self {
        CheckoutConfig {
            delivery_fee: DELIVERY_FEE,
            gateway_timeout_secs: DEFAULT_GATEWAY_TIMEOUT.as_secs(),
            currency_symbol: "₹".to_string(),
        }
    }
}

impl CheckoutConfig {
    /// Creates a CheckoutConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `MILKRUN_DELIVERY_FEE`: Override the delivery fee in whole rupees
    /// - `MILKRUN_GATEWAY_TIMEOUT_SECS`: Override the gateway deadline
    /// - `MILKRUN_CURRENCY_SYMBOL`: Override the display symbol
    pub fn from_env() -> Self {
        let mut config = CheckoutConfig::default();

        if let Ok(fee_str) = std::env::var("MILKRUN_DELIVERY_FEE") {
            if let Ok(fee) = fee_str.parse::<i64>() {
                config.delivery_fee = Money::from_rupees(fee);
            }
        }

        if let Ok(timeout_str) = std::env::var("MILKRUN_GATEWAY_TIMEOUT_SECS") {
            if let Ok(secs) = timeout_str.parse::<u64>() {
                config.gateway_timeout_secs = secs;
            }
        }

        if let Ok(symbol) = std::env::var("MILKRUN_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// The gateway deadline as a Duration.
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    /// Formats a money amount with the configured symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        let rupees = amount.rupees();
        format!(
            "{}{}{}",
            if rupees < 0 { "-" } else { "" },
            self.currency_symbol,
            rupees.abs()
        )
    }
}
