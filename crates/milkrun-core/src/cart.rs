//! # Cart Module
//!
//! Cart lines and the immutable-update cart state.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Storefront Action         Operation               Result              │
//! │  ─────────────────         ─────────               ──────              │
//! │                                                                         │
//! │  Tap product ────────────► add_line() ───────────► new Cart (merged)   │
//! │                                                                         │
//! │  Tap +/− stepper ────────► change_quantity() ────► new Cart (floor 1)  │
//! │                                                                         │
//! │  Tap trash icon ─────────► remove_line() ────────► new Cart            │
//! │                                                                         │
//! │  Checkout settles ───────► clear() ──────────────► new empty Cart      │
//! │                                                                         │
//! │  NOTE: Every operation returns a fresh, fully-defined Cart. The        │
//! │        previous value is never mutated, so a pricing recomputation     │
//! │        can never observe a half-updated state.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::rate::DiscountRate;
use crate::validation::{
    validate_cart_size, validate_price, validate_product_id, validate_quantity,
};
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Line Subscription
// =============================================================================

/// A per-product recurring-delivery attachment with its own discount.
///
/// Independent of the cart-wide cadence: a daily yogurt subscription keeps
/// its 10% saving whether the cart itself is one-time or monthly, and the
/// two discounts stack additively (see pricing.rs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineSubscription {
    /// Delivery frequency shown on the line chip (e.g. "daily").
    pub cadence_label: String,

    /// The saving granted by this attachment.
    pub rate: DiscountRate,
}

// =============================================================================
// Product Offer
// =============================================================================

/// What the catalog collaborator supplies for one product.
///
/// The catalog is read-only from this crate's perspective; an offer is the
/// bundle of data needed to construct a cart line from it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductOffer {
    /// Catalog identifier for the product.
    pub product_id: String,

    /// Display name (e.g. "Organic A2 Milk").
    pub name: String,

    /// Pack size shown next to the price (e.g. "500ml").
    pub unit_label: String,

    /// Unit price in whole rupees.
    pub price: Money,

    /// Optional per-line subscription offer for this product.
    pub subscription: Option<LineSubscription>,
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product line in the cart.
///
/// ## Design Notes
/// Product data is frozen at add time (snapshot pattern): if the catalog
/// price changes after the product lands in the cart, the cart keeps
/// displaying and pricing the original offer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog product id; doubles as the line identifier.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Pack size at time of adding (frozen).
    pub unit_label: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    /// Quantity in cart; never below 1.
    pub quantity: i64,

    /// Per-line subscription attachment, if the product carries one.
    pub subscription: Option<LineSubscription>,

    /// When this line was added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a cart line from a catalog offer and quantity.
    fn from_offer(offer: &ProductOffer, quantity: i64) -> Self {
        CartLine {
            product_id: offer.product_id.clone(),
            name: offer.name.clone(),
            unit_label: offer.unit_label.clone(),
            unit_price: offer.price,
            quantity,
            subscription: offer.subscription.clone(),
            added_at: Utc::now(),
        }
    }

    /// The line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// The discount rate of this line's subscription attachment (zero when
    /// the line has none).
    #[inline]
    pub fn subscription_rate(&self) -> DiscountRate {
        self.subscription
            .as_ref()
            .map(|s| s.rate)
            .unwrap_or_default()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: an immutable-update collection of lines.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges
///   quantities)
/// - Quantity is ≥ 1 on every line; `change_quantity` floors at 1
/// - Maximum distinct lines: 100; maximum quantity per line: 999
/// - Mutations referencing an unknown line id are silent no-ops (a stale
///   UI reference must not crash the session)
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a catalog offer to the cart, returning the new cart state.
    ///
    /// ## Behavior
    /// - If the product is already in the cart: quantities merge
    /// - If the product is not in the cart: a new line is appended
    ///
    /// ## Errors
    /// - Offer or quantity fails boundary validation
    /// - Merged quantity would exceed the per-line maximum
    /// - Cart is already at the line limit
    pub fn add_line(&self, offer: &ProductOffer, quantity: i64) -> CoreResult<Cart> {
        validate_product_id(&offer.product_id)?;
        validate_price(offer.price.rupees())?;
        validate_quantity(quantity)?;

        let mut next = self.clone();

        if let Some(line) = next
            .lines
            .iter_mut()
            .find(|l| l.product_id == offer.product_id)
        {
            let merged = line.quantity + quantity;
            if merged > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = merged;
            return Ok(next);
        }

        validate_cart_size(next.lines.len())?;
        next.lines.push(CartLine::from_offer(offer, quantity));
        Ok(next)
    }

    /// Applies a quantity delta to a line, returning the new cart state.
    ///
    /// New quantity = `max(1, current + delta)`, capped at the per-line
    /// maximum. Decrementing below 1 leaves the line at quantity 1 (the
    /// trash icon, not the stepper, removes lines). An unknown `product_id`
    /// returns the cart unchanged.
    pub fn change_quantity(&self, product_id: &str, delta: i64) -> Cart {
        let mut next = self.clone();

        // Unknown id: stale UI reference, leave the cart as-is
        if let Some(line) = next.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = (line.quantity + delta).clamp(1, MAX_LINE_QUANTITY);
        }

        next
    }

    /// Removes a line, returning the new cart state.
    ///
    /// Idempotent: removing an id that is not present returns an identical
    /// cart.
    pub fn remove_line(&self, product_id: &str) -> Cart {
        let mut next = self.clone();
        next.lines.retain(|l| l.product_id != product_id);
        next
    }

    /// Returns a fresh empty cart.
    pub fn clear(&self) -> Cart {
        Cart::new()
    }

    /// The lines currently in the cart.
    #[inline]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up a line by product id.
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the subtotal (before discounts and delivery fee).
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn milk() -> ProductOffer {
        ProductOffer {
            product_id: "milk-a2-500".to_string(),
            name: "Organic A2 Milk".to_string(),
            unit_label: "500ml".to_string(),
            price: Money::from_rupees(55),
            subscription: None,
        }
    }

    fn yogurt() -> ProductOffer {
        ProductOffer {
            product_id: "yogurt-greek-400".to_string(),
            name: "Greek Yogurt".to_string(),
            unit_label: "400g".to_string(),
            price: Money::from_rupees(65),
            subscription: Some(LineSubscription {
                cadence_label: "daily".to_string(),
                rate: "10%".parse().unwrap(),
            }),
        }
    }

    #[test]
    fn test_add_line() {
        let cart = Cart::new().add_line(&milk(), 1).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 1);
        assert_eq!(cart.subtotal().rupees(), 55);
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let cart = Cart::new()
            .add_line(&milk(), 1)
            .unwrap()
            .add_line(&milk(), 2)
            .unwrap();

        assert_eq!(cart.line_count(), 1); // still one distinct line
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let cart = Cart::new();

        assert!(cart.add_line(&milk(), 0).is_err());
        assert!(cart.add_line(&milk(), -2).is_err());

        let mut free_floating = milk();
        free_floating.product_id = "  ".to_string();
        assert!(cart.add_line(&free_floating, 1).is_err());
    }

    #[test]
    fn test_merge_respects_quantity_cap() {
        let cart = Cart::new().add_line(&milk(), 999).unwrap();
        let err = cart.add_line(&milk(), 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_quantity_floor() {
        let cart = Cart::new().add_line(&milk(), 1).unwrap();

        // Decrementing below 1 is a no-op on the line
        let cart = cart.change_quantity("milk-a2-500", -1);
        assert_eq!(cart.line("milk-a2-500").unwrap().quantity, 1);

        // Even a huge negative delta floors at 1
        let cart = cart.change_quantity("milk-a2-500", -100);
        assert_eq!(cart.line("milk-a2-500").unwrap().quantity, 1);

        let cart = cart.change_quantity("milk-a2-500", 3);
        assert_eq!(cart.line("milk-a2-500").unwrap().quantity, 4);
    }

    #[test]
    fn test_change_quantity_unknown_id_is_noop() {
        let cart = Cart::new().add_line(&milk(), 2).unwrap();
        let unchanged = cart.change_quantity("paneer-200", 1);

        assert_eq!(unchanged.line_count(), 1);
        assert_eq!(unchanged.total_quantity(), 2);
    }

    #[test]
    fn test_remove_line_is_idempotent() {
        let cart = Cart::new()
            .add_line(&milk(), 1)
            .unwrap()
            .add_line(&yogurt(), 2)
            .unwrap();

        let once = cart.remove_line("milk-a2-500");
        assert_eq!(once.line_count(), 1);

        let twice = once.remove_line("milk-a2-500");
        assert_eq!(twice.line_count(), 1);
        assert!(twice.line("yogurt-greek-400").is_some());
    }

    #[test]
    fn test_operations_leave_original_untouched() {
        let cart = Cart::new().add_line(&milk(), 2).unwrap();

        let _bigger = cart.change_quantity("milk-a2-500", 5);
        let _smaller = cart.remove_line("milk-a2-500");

        // The starting value is still fully intact
        assert_eq!(cart.line("milk-a2-500").unwrap().quantity, 2);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_line_snapshot_is_frozen() {
        let mut offer = milk();
        let cart = Cart::new().add_line(&offer, 1).unwrap();

        // Catalog price changes after the product is in the cart
        offer.price = Money::from_rupees(70);

        assert_eq!(cart.line("milk-a2-500").unwrap().unit_price.rupees(), 55);
    }

    #[test]
    fn test_clear() {
        let cart = Cart::new().add_line(&milk(), 1).unwrap();
        assert!(!cart.is_empty());

        let cleared = cart.clear();
        assert!(cleared.is_empty());
        assert_eq!(cleared.subtotal(), Money::zero());
    }

    #[test]
    fn test_subscription_rate_defaults_to_zero() {
        let cart = Cart::new()
            .add_line(&milk(), 1)
            .unwrap()
            .add_line(&yogurt(), 1)
            .unwrap();

        assert!(cart.line("milk-a2-500").unwrap().subscription_rate().is_zero());
        assert_eq!(
            cart.line("yogurt-greek-400").unwrap().subscription_rate().bps(),
            1000
        );
    }
}
