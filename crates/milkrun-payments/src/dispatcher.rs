//! # Payment Dispatcher
//!
//! Routes a resolved total to the chosen payment backend and tracks the
//! per-attempt state machine.
//!
//! ## Attempt State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                 no method selected ──► rejected, no transition          │
//! │                        │                                                │
//! │   ┌──────┐   checkout  │   ┌────────────┐  gateway ok   ┌─────────┐    │
//! │   │ Idle │─────────────┴──►│ Processing │──────────────►│ Settled │    │
//! │   └──────┘                 └─────┬──────┘               └─────────┘    │
//! │      ▲                           │                                      │
//! │      │                           │ gateway error / timeout              │
//! │      │        retry              ▼                                      │
//! │      └───────────────────── ┌─────────┐                                 │
//! │                             │ Failed  │                                 │
//! │                             └─────────┘                                 │
//! │                                                                         │
//! │  • Cash on delivery jumps Processing → Settled synchronously            │
//! │  • Re-entrant checkout while Processing is rejected, never queued       │
//! │  • Exactly one terminal state per attempt                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, error, info};

use milkrun_core::Money;

use crate::error::{GatewayError, PaymentError, PaymentResult};
use crate::gateway::{fetch_availability, GatewayDirectory, PaymentGateway, PaymentMethod};

/// Default deadline for a gateway round-trip.
///
/// The gateway contract promises exactly-once resolution, but a hung SDK or
/// dead network would otherwise leave the session in Processing forever.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Attempt Phase
// =============================================================================

/// Where the current checkout attempt stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "phase")]
pub enum AttemptPhase {
    /// No attempt in flight.
    Idle,
    /// A payment is being processed; further checkouts are rejected.
    Processing,
    /// The attempt settled. Gateway methods carry an opaque reference;
    /// cash on delivery settles without one.
    Settled { reference: Option<String> },
    /// The attempt failed; the session may retry.
    Failed { reason: String },
}

// =============================================================================
// Settlement
// =============================================================================

/// The successful outcome of a payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// The method that settled.
    pub method: PaymentMethod,

    /// Gateway-issued payment reference; `None` for cash on delivery.
    pub reference: Option<String>,
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Dispatches payment attempts to registered gateway backends.
///
/// One dispatcher serves one cart session; the embedded phase is the
/// session's re-entrancy guard.
pub struct PaymentDispatcher {
    directory: Arc<dyn GatewayDirectory>,
    gateways: HashMap<PaymentMethod, Arc<dyn PaymentGateway>>,
    gateway_timeout: Duration,
    phase: Mutex<AttemptPhase>,
}

impl PaymentDispatcher {
    /// Creates a dispatcher with no registered gateways (cash on delivery
    /// still works) and the default timeout.
    pub fn new(directory: Arc<dyn GatewayDirectory>) -> Self {
        PaymentDispatcher {
            directory,
            gateways: HashMap::new(),
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
            phase: Mutex::new(AttemptPhase::Idle),
        }
    }

    /// Registers a gateway backend for a method (builder style).
    pub fn register(mut self, method: PaymentMethod, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateways.insert(method, gateway);
        self
    }

    /// Overrides the gateway deadline (builder style).
    pub fn with_timeout(mut self, gateway_timeout: Duration) -> Self {
        self.gateway_timeout = gateway_timeout;
        self
    }

    /// The current attempt phase.
    pub fn phase(&self) -> AttemptPhase {
        self.phase.lock().expect("phase mutex poisoned").clone()
    }

    /// Claims the attempt slot. Rejected while another attempt is
    /// processing; Idle, Settled and Failed all allow a fresh attempt.
    fn begin_attempt(&self) -> PaymentResult<()> {
        let mut phase = self.phase.lock().expect("phase mutex poisoned");
        if *phase == AttemptPhase::Processing {
            return Err(PaymentError::AttemptInFlight);
        }
        *phase = AttemptPhase::Processing;
        Ok(())
    }

    /// Leaves the Processing state. Every dispatch path must end here so
    /// the checkout button can never be stuck on "Processing...".
    fn finish(&self, next: AttemptPhase) {
        *self.phase.lock().expect("phase mutex poisoned") = next;
    }

    /// Dispatches a payment attempt.
    ///
    /// ## Guards (checked in order)
    /// 1. A method must be selected - `NoMethodSelected`, no transition
    /// 2. No attempt may already be processing - `AttemptInFlight`
    /// 3. Gateway methods must be toggled on and registered -
    ///    `GatewayUnavailable`, phase returns to Idle (a guard failure is
    ///    not an attempt outcome)
    ///
    /// ## Outcomes
    /// Exactly one per attempt: `Ok(Settlement)` (phase `Settled`) or a
    /// gateway/timeout error (phase `Failed`, retry allowed).
    pub async fn dispatch(
        &self,
        method: Option<PaymentMethod>,
        total: Money,
        order_id: &str,
    ) -> PaymentResult<Settlement> {
        let method = method.ok_or(PaymentError::NoMethodSelected)?;

        self.begin_attempt()?;
        debug!(%method, %total, order_id = %order_id, "payment attempt started");

        // Cash on delivery settles on the spot: no gateway, no reference,
        // no suspension.
        if !method.requires_gateway() {
            self.finish(AttemptPhase::Settled { reference: None });
            info!(%method, %total, order_id = %order_id, "payment settled");
            return Ok(Settlement {
                method,
                reference: None,
            });
        }

        let availability = fetch_availability(self.directory.as_ref()).await;
        if !availability.is_available(method) {
            self.finish(AttemptPhase::Idle);
            return Err(PaymentError::GatewayUnavailable(method));
        }

        let gateway = match self.gateways.get(&method) {
            Some(gateway) => Arc::clone(gateway),
            None => {
                self.finish(AttemptPhase::Idle);
                return Err(PaymentError::GatewayUnavailable(method));
            }
        };

        match timeout(self.gateway_timeout, gateway.initiate(total, order_id)).await {
            Ok(Ok(reference)) => {
                self.finish(AttemptPhase::Settled {
                    reference: Some(reference.clone()),
                });
                info!(%method, %total, order_id = %order_id, reference = %reference, "payment settled");
                Ok(Settlement {
                    method,
                    reference: Some(reference),
                })
            }
            Ok(Err(err)) => {
                self.finish(AttemptPhase::Failed {
                    reason: err.to_string(),
                });
                error!(%method, order_id = %order_id, error = %err, "payment failed");
                Err(err.into())
            }
            Err(_elapsed) => {
                let err = GatewayError::TimedOut;
                self.finish(AttemptPhase::Failed {
                    reason: err.to_string(),
                });
                error!(%method, order_id = %order_id, timeout = ?self.gateway_timeout, "gateway timed out");
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for PaymentDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDispatcher")
            .field("registered", &self.gateways.keys().collect::<Vec<_>>())
            .field("gateway_timeout", &self.gateway_timeout)
            .field("phase", &self.phase())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
