//! # milkrun-payments: Payment Gateway Layer for Milkrun
//!
//! Everything between "the user tapped Proceed to Checkout" and "the money
//! moved (or didn't)".
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   milkrun-checkout ──► PaymentDispatcher ──┬──► Razorpay backend        │
//! │   (session layer)      │                   ├──► PhonePe backend         │
//! │                        │                   └──► (cash: no backend)      │
//! │                        │                                                │
//! │                        └──► GatewayDirectory (admin toggles)            │
//! │                                                                         │
//! │   All gateway traffic flows through this crate. milkrun-core stays     │
//! │   pure; the checkout crate stays orchestration-only.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`gateway`] - Payment methods, availability, and the async contracts
//! - [`dispatcher`] - The per-attempt state machine with timeout hardening
//! - [`mock`] - SDK stand-ins and scripted test doubles
//! - [`error`] - Payment error taxonomy

pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod mock;

pub use dispatcher::{AttemptPhase, PaymentDispatcher, Settlement, DEFAULT_GATEWAY_TIMEOUT};
pub use error::{GatewayError, PaymentError, PaymentResult};
pub use gateway::{
    fetch_availability, GatewayAvailability, GatewayDirectory, PaymentGateway, PaymentMethod,
};
