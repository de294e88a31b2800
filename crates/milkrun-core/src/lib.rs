//! # milkrun-core: Pure Business Logic for Milkrun
//!
//! This crate is the **heart** of Milkrun, the commerce core of a
//! subscription dairy-delivery storefront. It contains all pricing logic as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Milkrun Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (TypeScript UI)                      │   │
//! │  │    Browse ──► Cart UI ──► Subscription picker ──► Checkout      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 milkrun-checkout (session layer)                │   │
//! │  │    CartSession, checkout flow, UI-facing errors                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ milkrun-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   cart    │  │  pricing  │  │subscription│ │   │
//! │  │   │   Money   │  │ CartLine  │  │ breakdown │  │  Cadence   │ │   │
//! │  │   │           │  │   Cart    │  │  engine   │  │   rates    │ │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GATEWAYS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`rate`] - Discount rates as structured basis points
//! - [`subscription`] - The cart-wide cadence and its discount schedule
//! - [`cart`] - Cart lines and the immutable-update cart
//! - [`pricing`] - The breakdown engine (subtotal/discount/fee/total)
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every computation is deterministic - same input =
//!    same output
//! 2. **Immutable Updates**: Cart mutations return a new cart, never patch
//!    shared state
//! 3. **Integer Money**: All monetary values are whole rupees (i64); the
//!    single rounding step lives in the pricing engine
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use milkrun_core::cart::{Cart, ProductOffer};
//! use milkrun_core::money::Money;
//! use milkrun_core::pricing::compute_breakdown;
//! use milkrun_core::subscription::Cadence;
//!
//! let milk = ProductOffer {
//!     product_id: "milk-a2-500".to_string(),
//!     name: "Organic A2 Milk".to_string(),
//!     unit_label: "500ml".to_string(),
//!     price: Money::from_rupees(55),
//!     subscription: None,
//! };
//!
//! let cart = Cart::new().add_line(&milk, 2).unwrap();
//! let breakdown = compute_breakdown(cart.lines(), Cadence::Weekly);
//!
//! // 110 − round(110 × 5%) + 15 delivery
//! assert_eq!(breakdown.total.rupees(), 110 - 6 + 15);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod rate;
pub mod subscription;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use milkrun_core::Money` instead of
// `use milkrun_core::money::Money`

pub use cart::{Cart, CartLine, LineSubscription, ProductOffer};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{compute_breakdown, compute_breakdown_with_fee, PricingBreakdown};
pub use rate::DiscountRate;
pub use subscription::Cadence;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat delivery fee applied to every non-empty order.
///
/// The storefront charges a single flat fee per delivery regardless of cart
/// size; free-delivery thresholds are a catalog concern, not a pricing one.
pub const DELIVERY_FEE: Money = Money::from_rupees(15);

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps order sizes reasonable for the
/// delivery fleet.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10 units
/// of milk).
pub const MAX_LINE_QUANTITY: i64 = 999;
