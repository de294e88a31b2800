//! # Cart Session
//!
//! One user's cart, cadence, and payment-method selection.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` because:
//! 1. The UI host may call from multiple tasks
//! 2. Only one caller should modify the session at a time
//! 3. Pricing reads must never observe a half-updated state
//!
//! There is still exactly one logical mutator (the interacting user); the
//! mutex is about task scheduling, not contention.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use milkrun_core::{
    compute_breakdown_with_fee, Cadence, Cart, CoreResult, Money, PricingBreakdown, ProductOffer,
};
use milkrun_payments::PaymentMethod;

// =============================================================================
// Cart Session
// =============================================================================

/// The per-user session state the checkout flow operates on.
///
/// Cart mutations go through the immutable-update `Cart` operations; the
/// session simply swaps in the returned state. The pricing breakdown is
/// always derived, never stored.
#[derive(Debug, Clone)]
pub struct CartSession {
    cart: Cart,
    cadence: Cadence,
    payment_method: Option<PaymentMethod>,
    started_at: DateTime<Utc>,
}

impl CartSession {
    /// Creates a fresh session: empty cart, one-time purchase, no payment
    /// method chosen yet.
    pub fn new() -> Self {
        CartSession {
            cart: Cart::new(),
            cadence: Cadence::OneTime,
            payment_method: None,
            started_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Cart mutation
    // -------------------------------------------------------------------------

    /// Adds a catalog offer to the cart.
    pub fn add_line(&mut self, offer: &ProductOffer, quantity: i64) -> CoreResult<()> {
        debug!(product_id = %offer.product_id, quantity, "add line");
        self.cart = self.cart.add_line(offer, quantity)?;
        Ok(())
    }

    /// Applies a quantity delta to a line (floored at 1).
    ///
    /// A stale line id is a silent no-op; it only shows up at debug level.
    pub fn change_quantity(&mut self, product_id: &str, delta: i64) {
        if self.cart.line(product_id).is_none() {
            debug!(product_id, "quantity change for line not in cart; ignoring");
        }
        self.cart = self.cart.change_quantity(product_id, delta);
    }

    /// Removes a line (idempotent).
    pub fn remove_line(&mut self, product_id: &str) {
        debug!(product_id, "remove line");
        self.cart = self.cart.remove_line(product_id);
    }

    /// Empties the cart (after settlement, or on user request).
    pub fn clear_cart(&mut self) {
        debug!("clear cart");
        self.cart = self.cart.clear();
    }

    // -------------------------------------------------------------------------
    // Selections
    // -------------------------------------------------------------------------

    /// Replaces the cart-wide cadence. Pure reassignment: per-line
    /// subscription attachments are untouched.
    pub fn select_cadence(&mut self, cadence: Cadence) {
        debug!(%cadence, "select cadence");
        self.cadence = cadence;
    }

    /// Replaces the cadence from a storefront option id. An unknown id is
    /// rejected before any state changes.
    pub fn select_cadence_label(&mut self, label: &str) -> CoreResult<()> {
        let cadence: Cadence = label.parse()?;
        self.select_cadence(cadence);
        Ok(())
    }

    /// Chooses the payment method for checkout.
    pub fn select_payment_method(&mut self, method: PaymentMethod) {
        debug!(%method, "select payment method");
        self.payment_method = Some(method);
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// The current cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The active cadence.
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// The chosen payment method, if any.
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// When this session started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Recomputes the pricing breakdown for the current state.
    pub fn breakdown(&self, delivery_fee: Money) -> PricingBreakdown {
        compute_breakdown_with_fee(self.cart.lines(), self.cadence, delivery_fee)
    }
}

impl Default for CartSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Session Handle
// =============================================================================

/// Shared handle to one cart session.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<CartSession>>`:
/// - `Arc`: shared ownership across the host's tasks
/// - `Mutex`: one mutation at a time; reads release the lock quickly
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<CartSession>>,
}

impl SessionHandle {
    /// Creates a handle around a fresh session.
    pub fn new() -> Self {
        SessionHandle {
            session: Arc::new(Mutex::new(CartSession::new())),
        }
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartSession) -> R,
    {
        let session = self.session.lock().expect("session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartSession) -> R,
    {
        let mut session = self.session.lock().expect("session mutex poisoned");
        f(&mut session)
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
