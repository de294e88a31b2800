//! # Checkout Flow
//!
//! Stitches the pricing engine and the payment dispatcher into the flow the
//! storefront's "Proceed to Checkout" button triggers.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(handle, dispatcher, config)                                   │
//! │                                                                         │
//! │  1. Snapshot session ──► empty cart? ──────────► EMPTY_CART            │
//! │  2. Compute breakdown, mint order id                                    │
//! │  3. dispatcher.dispatch(method, total, order_id)                       │
//! │        │                                                               │
//! │        ├── no method ──────────────────────────► NO_PAYMENT_METHOD     │
//! │        ├── already processing ─────────────────► PAYMENT_IN_FLIGHT     │
//! │        ├── gateway failed/timed out ───────────► PAYMENT_FAILED        │
//! │        │        (cart is PRESERVED, user may retry)                    │
//! │        │                                                               │
//! │        └── settled ──► clear cart ──► CheckoutReceipt                  │
//! │                         │                                              │
//! │                         └── destination: recurring cadence?            │
//! │                               yes ► subscription-tracking              │
//! │                               no  ► order-confirmation                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use milkrun_core::PricingBreakdown;
use milkrun_payments::{PaymentDispatcher, PaymentMethod};

use crate::config::CheckoutConfig;
use crate::error::CheckoutError;
use crate::session::SessionHandle;

// =============================================================================
// Destination
// =============================================================================

/// Where the UI routes after a settled checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    /// Recurring cadence: the user lands on their subscription tracker.
    SubscriptionTracking,
    /// One-time purchase: plain order confirmation.
    OrderConfirmation,
}

// =============================================================================
// Receipt
// =============================================================================

/// The successful outcome of a checkout, handed back to the UI host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// Opaque order identifier minted for this checkout.
    pub order_id: String,

    /// The method that settled the payment.
    pub method: PaymentMethod,

    /// Gateway payment reference; `None` for cash on delivery.
    pub reference: Option<String>,

    /// The priced order as charged.
    pub breakdown: PricingBreakdown,

    /// Where the UI should route next.
    pub destination: Destination,
}

// =============================================================================
// Checkout
// =============================================================================

/// Mints an opaque order identifier.
fn mint_order_id() -> String {
    format!("order_{}", Uuid::new_v4().simple())
}

/// Runs one checkout attempt for the session.
///
/// On settlement the cart is cleared and a receipt returned; on any failure
/// the cart is preserved exactly as it was, the session returns to idle, and
/// the error carries a message ready for the notification toast. The session
/// is never left stuck mid-checkout.
pub async fn checkout(
    handle: &SessionHandle,
    dispatcher: &PaymentDispatcher,
    config: &CheckoutConfig,
) -> Result<CheckoutReceipt, CheckoutError> {
    let (is_empty, method, cadence, breakdown) = handle.with_session(|s| {
        (
            s.cart().is_empty(),
            s.payment_method(),
            s.cadence(),
            s.breakdown(config.delivery_fee),
        )
    });

    if is_empty {
        return Err(CheckoutError::empty_cart());
    }

    let order_id = mint_order_id();
    info!(
        order_id = %order_id,
        total = %config.format_currency(breakdown.total),
        %cadence,
        "checkout started"
    );

    match dispatcher.dispatch(method, breakdown.total, &order_id).await {
        Ok(settlement) => {
            handle.with_session_mut(|s| s.clear_cart());

            let destination = if cadence.is_recurring() {
                Destination::SubscriptionTracking
            } else {
                Destination::OrderConfirmation
            };

            info!(order_id = %order_id, method = %settlement.method, ?destination, "checkout settled");

            Ok(CheckoutReceipt {
                order_id,
                method: settlement.method,
                reference: settlement.reference,
                breakdown,
                destination,
            })
        }
        Err(err) => {
            // Cart stays intact; the user can fix the problem and retry.
            warn!(order_id = %order_id, error = %err, "checkout failed");
            Err(err.into())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use milkrun_core::{Cadence, LineSubscription, Money, ProductOffer};
    use milkrun_payments::mock::{ScriptedGateway, StaticDirectory};
    use milkrun_payments::AttemptPhase;

    use crate::error::ErrorCode;

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

    /// The reference storefront cart: ₹55 milk ×1, ₹65 yogurt ×2 (10% daily).
    fn seeded_session() -> SessionHandle {
        let handle = SessionHandle::new();
        handle.with_session_mut(|s| {
            s.add_line(&milk(), 1).unwrap();
            s.add_line(&yogurt(), 2).unwrap();
        });
        handle
    }

    fn dispatcher(gateway: Arc<ScriptedGateway>) -> PaymentDispatcher {
        PaymentDispatcher::new(Arc::new(StaticDirectory::new(true, false)))
            .register(PaymentMethod::Razorpay, gateway)
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let handle = SessionHandle::new();
        let dispatcher = dispatcher(Arc::new(ScriptedGateway::settle("rzp_x")));

        let err = checkout(&handle, &dispatcher, &CheckoutConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::EmptyCart);
    }

    #[tokio::test]
    async fn test_no_payment_method_blocks_checkout_and_keeps_cart() {
        let handle = seeded_session();
        let dispatcher = dispatcher(Arc::new(ScriptedGateway::settle("rzp_x")));

        let err = checkout(&handle, &dispatcher, &CheckoutConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NoPaymentMethod);
        assert_eq!(dispatcher.phase(), AttemptPhase::Idle);

        // Cart unmodified
        let (count, quantity) =
            handle.with_session(|s| (s.cart().line_count(), s.cart().total_quantity()));
        assert_eq!(count, 2);
        assert_eq!(quantity, 3);
    }

    #[tokio::test]
    async fn test_cash_on_delivery_one_time_checkout() {
        let handle = seeded_session();
        handle.with_session_mut(|s| s.select_payment_method(PaymentMethod::CashOnDelivery));

        let gateway = Arc::new(ScriptedGateway::settle("rzp_x"));
        let dispatcher = dispatcher(Arc::clone(&gateway));

        let receipt = checkout(&handle, &dispatcher, &CheckoutConfig::default())
            .await
            .unwrap();

        // 185 − 13 + 15
        assert_eq!(receipt.breakdown.subtotal.rupees(), 185);
        assert_eq!(receipt.breakdown.discount.rupees(), 13);
        assert_eq!(receipt.breakdown.total.rupees(), 187);
        assert_eq!(receipt.method, PaymentMethod::CashOnDelivery);
        assert_eq!(receipt.reference, None);
        assert_eq!(receipt.destination, Destination::OrderConfirmation);
        assert!(receipt.order_id.starts_with("order_"));

        // No gateway involvement, and the cart cleared on settlement
        assert_eq!(gateway.call_count(), 0);
        assert!(handle.with_session(|s| s.cart().is_empty()));
    }

    #[tokio::test]
    async fn test_recurring_cadence_routes_to_subscription_tracking() {
        let handle = seeded_session();
        handle.with_session_mut(|s| {
            s.select_cadence(Cadence::Monthly);
            s.select_payment_method(PaymentMethod::Razorpay);
        });

        let dispatcher = dispatcher(Arc::new(ScriptedGateway::settle("rzp_sub_1")));

        let receipt = checkout(&handle, &dispatcher, &CheckoutConfig::default())
            .await
            .unwrap();

        // Scenario B totals: discount 13 + round(14.8) = 28, total 172
        assert_eq!(receipt.breakdown.discount.rupees(), 28);
        assert_eq!(receipt.breakdown.total.rupees(), 172);
        assert_eq!(receipt.reference.as_deref(), Some("rzp_sub_1"));
        assert_eq!(receipt.destination, Destination::SubscriptionTracking);
    }

    #[tokio::test]
    async fn test_failed_payment_preserves_cart_and_allows_retry() {
        let handle = seeded_session();
        handle.with_session_mut(|s| s.select_payment_method(PaymentMethod::Razorpay));

        let gateway = Arc::new(ScriptedGateway::decline_then_settle(
            "network blip",
            "rzp_second_try",
        ));
        let dispatcher = dispatcher(Arc::clone(&gateway));
        let config = CheckoutConfig::default();

        let err = checkout(&handle, &dispatcher, &config).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentFailed);

        // Cart survives the failure
        assert_eq!(handle.with_session(|s| s.cart().line_count()), 2);

        // Retry settles and clears the cart
        let receipt = checkout(&handle, &dispatcher, &config).await.unwrap();
        assert_eq!(receipt.reference.as_deref(), Some("rzp_second_try"));
        assert!(handle.with_session(|s| s.cart().is_empty()));
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_configured_delivery_fee_flows_into_totals() {
        let handle = seeded_session();
        handle.with_session_mut(|s| s.select_payment_method(PaymentMethod::CashOnDelivery));

        let dispatcher = dispatcher(Arc::new(ScriptedGateway::settle("rzp_x")));
        let config = CheckoutConfig {
            delivery_fee: Money::from_rupees(25),
            ..CheckoutConfig::default()
        };

        let receipt = checkout(&handle, &dispatcher, &config).await.unwrap();
        assert_eq!(receipt.breakdown.delivery_fee.rupees(), 25);
        assert_eq!(receipt.breakdown.total.rupees(), 185 - 13 + 25);
    }
}
