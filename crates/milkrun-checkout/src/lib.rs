//! # milkrun-checkout: Session Orchestration for Milkrun
//!
//! The surface the UI host calls. Owns per-session state and drives the
//! checkout flow end to end.
//!
//! ## Module Organization
//! ```text
//! milkrun_checkout/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── session.rs      ◄─── CartSession + shared SessionHandle
//! ├── checkout.rs     ◄─── The checkout flow and receipt
//! ├── config.rs       ◄─── Delivery fee, timeouts, env overrides
//! └── error.rs        ◄─── UI-facing error type (code + message)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use milkrun_checkout::{checkout, CheckoutConfig, SessionHandle};
//! use milkrun_payments::mock::{MockGateway, StaticDirectory};
//! use milkrun_payments::{PaymentDispatcher, PaymentMethod};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionHandle::new();
//! let config = CheckoutConfig::from_env();
//! let dispatcher = PaymentDispatcher::new(Arc::new(StaticDirectory::new(true, false)))
//!     .register(PaymentMethod::Razorpay, Arc::new(MockGateway::razorpay()))
//!     .with_timeout(config.gateway_timeout());
//!
//! // ...cart mutations via session.with_session_mut()...
//!
//! let receipt = checkout(&session, &dispatcher, &config).await?;
//! println!("order {} settled", receipt.order_id);
//! # Ok(())
//! # }
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod session;

pub use checkout::{checkout, CheckoutReceipt, Destination};
pub use config::CheckoutConfig;
pub use error::{CheckoutError, ErrorCode};
pub use session::{CartSession, SessionHandle};
