//! # Pricing Engine
//!
//! Turns cart lines and the cart-wide cadence into a payable total.
//!
//! ## Discount Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TWO DISCOUNT SOURCES, ONE ROUNDING STEP                                │
//! │                                                                         │
//! │  per-line:   Σ  line_total × line_rate     (subscribed lines only)     │
//! │  cart-wide:     subtotal   × cadence_rate  (on the FULL subtotal)      │
//! │                                                                         │
//! │  Both components accumulate unrounded, in basis-point space, and the   │
//! │  combined sum is rounded half-up to the nearest rupee exactly once.    │
//! │                                                                         │
//! │  Additive, never compounded: the cart-wide rate applies to the full    │
//! │  subtotal, not to the already line-discounted amount. Rounding once    │
//! │  on the aggregate means fractions below half a rupee still count when  │
//! │  they sum past the boundary, and no drift accumulates across lines.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Worked Example (monthly cart)
//! ```text
//! Organic A2 Milk   ₹55 × 1              line total  ₹55
//! Greek Yogurt      ₹65 × 2  (daily 10%) line total ₹130
//!                                        ──────────────
//!                                        subtotal   ₹185
//! line discount  130 × 10%  = 13.0
//! cart discount  185 × 8%   = 14.8
//! discount       round(27.8)           = ₹28
//! delivery fee                         = ₹15
//! total          185 − 28 + 15         = ₹172
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::Money;
use crate::subscription::Cadence;
use crate::DELIVERY_FEE;

/// Basis-point denominator: rates are in 1/10000ths.
const BPS_DENOM: i128 = 10_000;

/// Half of the denominator, added before division for half-up rounding.
const BPS_HALF: i128 = 5_000;

// =============================================================================
// Pricing Breakdown
// =============================================================================

/// The computed order summary.
///
/// A pure projection of `(lines, cadence)` — never stored, never a source of
/// truth. Recomputed on every cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    /// Sum of line totals before any discount.
    pub subtotal: Money,

    /// Combined subscription discount, rounded once.
    pub discount: Money,

    /// Flat delivery fee (zero only for an empty cart).
    pub delivery_fee: Money,

    /// Payable amount: subtotal − discount + delivery fee, clamped at zero.
    pub total: Money,
}

// =============================================================================
// Engine
// =============================================================================

/// Computes the pricing breakdown with the standard delivery fee.
///
/// Pure and deterministic: identical inputs produce identical output, and
/// line order is irrelevant.
pub fn compute_breakdown(lines: &[CartLine], cadence: Cadence) -> PricingBreakdown {
    compute_breakdown_with_fee(lines, cadence, DELIVERY_FEE)
}

/// Computes the pricing breakdown with an explicit delivery fee (the
/// checkout layer passes its configured fee through here).
pub fn compute_breakdown_with_fee(
    lines: &[CartLine],
    cadence: Cadence,
    delivery_fee: Money,
) -> PricingBreakdown {
    let subtotal: Money = lines.iter().map(CartLine::line_total).sum();

    // Accumulate both discount components unrounded, in bps-space.
    let mut raw_bps: i128 = 0;

    for line in lines {
        raw_bps += line.line_total().rupees() as i128 * line.subscription_rate().bps() as i128;
    }

    raw_bps += subtotal.rupees() as i128 * cadence.discount_rate().bps() as i128;

    // The single rounding step: half-up to the nearest rupee.
    let discount = Money::from_rupees(((raw_bps + BPS_HALF) / BPS_DENOM) as i64);

    // The fee only applies once there is something to deliver; checkout
    // rejects empty carts before fees matter anyway.
    let delivery_fee = if lines.is_empty() {
        Money::zero()
    } else {
        delivery_fee
    };

    let total = (subtotal - discount + delivery_fee).clamp_non_negative();

    PricingBreakdown {
        subtotal,
        discount,
        delivery_fee,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, LineSubscription, ProductOffer};

    fn offer(id: &str, price: i64, sub_rate: Option<&str>) -> ProductOffer {
        ProductOffer {
            product_id: id.to_string(),
            name: format!("Product {}", id),
            unit_label: "500ml".to_string(),
            price: Money::from_rupees(price),
            subscription: sub_rate.map(|r| LineSubscription {
                cadence_label: "daily".to_string(),
                rate: r.parse().unwrap(),
            }),
        }
    }

    /// The reference storefront cart: ₹55 milk ×1, ₹65 yogurt ×2 with a
    /// 10% daily line subscription.
    fn reference_cart() -> Cart {
        Cart::new()
            .add_line(&offer("milk", 55, None), 1)
            .unwrap()
            .add_line(&offer("yogurt", 65, Some("10%")), 2)
            .unwrap()
    }

    #[test]
    fn test_empty_cart() {
        let breakdown = compute_breakdown(&[], Cadence::Monthly);

        assert_eq!(breakdown.subtotal, Money::zero());
        assert_eq!(breakdown.discount, Money::zero());
        assert_eq!(breakdown.delivery_fee, Money::zero());
        assert_eq!(breakdown.total, Money::zero());
    }

    #[test]
    fn test_one_time_scenario() {
        // subtotal = 55 + 130 = 185; line discount = round(13.0) = 13;
        // fee = 15; total = 185 − 13 + 15 = 187
        let cart = reference_cart();
        let breakdown = compute_breakdown(cart.lines(), Cadence::OneTime);

        assert_eq!(breakdown.subtotal.rupees(), 185);
        assert_eq!(breakdown.discount.rupees(), 13);
        assert_eq!(breakdown.delivery_fee.rupees(), 15);
        assert_eq!(breakdown.total.rupees(), 187);
    }

    #[test]
    fn test_monthly_scenario() {
        // line 13.0 + cart-wide 185 × 8% = 14.8; round(27.8) = 28;
        // total = 185 − 28 + 15 = 172
        let cart = reference_cart();
        let breakdown = compute_breakdown(cart.lines(), Cadence::Monthly);

        assert_eq!(breakdown.subtotal.rupees(), 185);
        assert_eq!(breakdown.discount.rupees(), 28);
        assert_eq!(breakdown.total.rupees(), 172);
    }

    #[test]
    fn test_weekly_discount_is_additive_not_compounded() {
        let cart = Cart::new()
            .add_line(&offer("paneer", 90, Some("10%")), 1)
            .unwrap();

        // additive:   90 × 10% + 90 × 5% = 9 + 4.50 = 13.5  → 14
        // compounded: 9 + (90 − 9) × 5%  = 9 + 4.05 = 13.05 → 13
        let breakdown = compute_breakdown(cart.lines(), Cadence::Weekly);
        assert_eq!(breakdown.discount.rupees(), 14);
    }

    #[test]
    fn test_rounding_applied_once_on_aggregate() {
        // Two components that each round to 0 in isolation but sum past
        // the half-rupee boundary: 3 × 10% = 0.3 and 7 × 5% = 0.35,
        // raw sum 0.65 → 1 after the single rounding step.
        let cart = Cart::new()
            .add_line(&offer("sample", 3, Some("10%")), 1)
            .unwrap()
            .add_line(&offer("treat", 4, None), 1)
            .unwrap();

        let breakdown = compute_breakdown(cart.lines(), Cadence::Weekly);

        // line: 3 × 10% = 0.30; cart-wide: 7 × 5% = 0.35; sum 0.65 → 1
        assert_eq!(breakdown.discount.rupees(), 1);
    }

    #[test]
    fn test_half_up_rounding() {
        // 10 × 5% = 0.5 exactly: half-up rounds to 1
        let cart = Cart::new().add_line(&offer("split", 10, None), 1).unwrap();
        let breakdown = compute_breakdown(cart.lines(), Cadence::Weekly);
        assert_eq!(breakdown.discount.rupees(), 1);
    }

    #[test]
    fn test_purity_and_order_independence() {
        let cart = reference_cart();

        let first = compute_breakdown(cart.lines(), Cadence::Monthly);
        let second = compute_breakdown(cart.lines(), Cadence::Monthly);
        assert_eq!(first, second);

        // Same lines, reversed order
        let mut reversed: Vec<CartLine> = cart.lines().to_vec();
        reversed.reverse();
        let third = compute_breakdown(&reversed, Cadence::Monthly);
        assert_eq!(first, third);
    }

    #[test]
    fn test_cadence_change_does_not_touch_line_subscriptions() {
        let cart = reference_cart();

        let monthly = compute_breakdown(cart.lines(), Cadence::Monthly);
        let one_time = compute_breakdown(cart.lines(), Cadence::OneTime);

        // The 13-rupee line discount survives in both
        assert_eq!(one_time.discount.rupees(), 13);
        assert!(monthly.discount.rupees() > one_time.discount.rupees());
    }

    #[test]
    fn test_total_clamped_at_zero() {
        // A 100%-subscribed line stacked with the monthly 8% pushes the
        // discount past subtotal + fee: 500 + 40 = 540, fee 15,
        // raw total 500 − 540 + 15 = −25 → clamped to 0.
        let cart = Cart::new()
            .add_line(&offer("hamper", 500, Some("100%")), 1)
            .unwrap();

        let breakdown = compute_breakdown(cart.lines(), Cadence::Monthly);
        assert_eq!(breakdown.discount.rupees(), 540);
        assert_eq!(breakdown.total, Money::zero());
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let cart = reference_cart();
        let json = serde_json::to_value(compute_breakdown(cart.lines(), Cadence::OneTime)).unwrap();

        assert_eq!(json["subtotal"], 185);
        assert_eq!(json["discount"], 13);
        assert_eq!(json["deliveryFee"], 15);
        assert_eq!(json["total"], 187);
    }

    #[test]
    fn test_custom_delivery_fee() {
        let cart = reference_cart();
        let breakdown =
            compute_breakdown_with_fee(cart.lines(), Cadence::OneTime, Money::from_rupees(25));

        assert_eq!(breakdown.delivery_fee.rupees(), 25);
        assert_eq!(breakdown.total.rupees(), 185 - 13 + 25);
    }
}
