//! # Mock Gateways
//!
//! Stand-ins for the real gateway SDK integrations.
//!
//! The production storefront wires actual Razorpay/PhonePe SDKs behind the
//! [`PaymentGateway`] contract. Until those land, [`MockGateway`] simulates
//! the round-trip: a short latency, then a settlement with a realistic
//! reference (`rzp_…` / `phonepe_…`). [`ScriptedGateway`] and the static
//! directories exist for tests that need to force a specific outcome.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use uuid::Uuid;

use milkrun_core::Money;

use crate::error::GatewayError;
use crate::gateway::{GatewayAvailability, GatewayDirectory, PaymentGateway, PaymentMethod};

// =============================================================================
// Mock Gateway
// =============================================================================

/// Simulated gateway latency, matching the demo SDK shims.
const MOCK_LATENCY: Duration = Duration::from_secs(2);

/// A gateway that always settles after a simulated round-trip.
#[derive(Debug)]
pub struct MockGateway {
    method: PaymentMethod,
    latency: Duration,
}

impl MockGateway {
    /// A mock Razorpay backend.
    pub fn razorpay() -> Self {
        MockGateway {
            method: PaymentMethod::Razorpay,
            latency: MOCK_LATENCY,
        }
    }

    /// A mock PhonePe backend.
    pub fn phonepe() -> Self {
        MockGateway {
            method: PaymentMethod::PhonePe,
            latency: MOCK_LATENCY,
        }
    }

    /// Overrides the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn reference_prefix(&self) -> &'static str {
        match self.method {
            PaymentMethod::Razorpay => "rzp",
            PaymentMethod::PhonePe => "phonepe",
            PaymentMethod::CashOnDelivery => "cod",
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn initiate(&self, _amount: Money, _order_id: &str) -> Result<String, GatewayError> {
        sleep(self.latency).await;
        Ok(format!(
            "{}_{}",
            self.reference_prefix(),
            Uuid::new_v4().simple()
        ))
    }
}

// =============================================================================
// Scripted Gateway (test double)
// =============================================================================

enum Script {
    Settle(String),
    Decline(String),
    DeclineThenSettle { detail: String, reference: String },
    Hang,
}

/// A gateway whose outcome is scripted up front.
///
/// Counts its invocations so tests can assert that cash on delivery and
/// guard rejections never reach a gateway.
pub struct ScriptedGateway {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    /// Always settles with the given reference.
    pub fn settle(reference: &str) -> Self {
        ScriptedGateway {
            script: Script::Settle(reference.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always declines with the given detail.
    pub fn decline(detail: &str) -> Self {
        ScriptedGateway {
            script: Script::Decline(detail.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Declines the first call, settles every call after it.
    pub fn decline_then_settle(detail: &str, reference: &str) -> Self {
        ScriptedGateway {
            script: Script::DeclineThenSettle {
                detail: detail.to_string(),
                reference: reference.to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Never resolves; used to exercise the dispatcher timeout.
    pub fn hang() -> Self {
        ScriptedGateway {
            script: Script::Hang,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `initiate` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn initiate(&self, _amount: Money, _order_id: &str) -> Result<String, GatewayError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.script {
            Script::Settle(reference) => Ok(reference.clone()),
            Script::Decline(detail) => Err(GatewayError::Declined {
                detail: detail.clone(),
            }),
            Script::DeclineThenSettle { detail, reference } => {
                if call == 0 {
                    Err(GatewayError::Declined {
                        detail: detail.clone(),
                    })
                } else {
                    Ok(reference.clone())
                }
            }
            Script::Hang => std::future::pending().await,
        }
    }
}

// =============================================================================
// Directories
// =============================================================================

/// A directory with fixed toggles.
#[derive(Debug, Clone, Copy)]
pub struct StaticDirectory {
    availability: GatewayAvailability,
}

impl StaticDirectory {
    pub fn new(razorpay: bool, phonepe: bool) -> Self {
        StaticDirectory {
            availability: GatewayAvailability { razorpay, phonepe },
        }
    }
}

#[async_trait]
impl GatewayDirectory for StaticDirectory {
    async fn available_gateways(&self) -> Result<GatewayAvailability, GatewayError> {
        Ok(self.availability)
    }
}

/// A directory that always fails, for exercising the cash-only fallback.
#[derive(Debug, Clone, Copy)]
pub struct UnreachableDirectory;

#[async_trait]
impl GatewayDirectory for UnreachableDirectory {
    async fn available_gateways(&self) -> Result<GatewayAvailability, GatewayError> {
        Err(GatewayError::Unreachable(
            "settings service not responding".to_string(),
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
