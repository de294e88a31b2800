//! # Subscription Cadence
//!
//! The cart-wide purchase cadence and its discount schedule.
//!
//! ## Cadence Schedule
//! ```text
//! ┌──────────────────┬──────────────────────────────┬──────────┐
//! │ Cadence          │ Storefront option            │ Discount │
//! ├──────────────────┼──────────────────────────────┼──────────┤
//! │ OneTime          │ "One-time purchase"          │    0%    │
//! │ Weekly           │ "Weekly subscription"        │    5%    │
//! │ Monthly          │ "Monthly subscription"       │    8%    │
//! └──────────────────┴──────────────────────────────┴──────────┘
//! ```
//!
//! Exactly one cadence is active for the whole cart at any time. Changing it
//! is a pure reassignment: per-line subscription attachments are independent
//! and stack with the cart-wide discount (see pricing.rs).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::rate::DiscountRate;

/// The recurring-delivery frequency selected for the whole cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Cadence {
    /// Single purchase, no recurring deliveries.
    #[default]
    OneTime,
    /// Delivered every week.
    Weekly,
    /// Delivered once a month.
    Monthly,
}

impl Cadence {
    /// The cart-wide discount rate granted by this cadence.
    #[inline]
    pub const fn discount_rate(&self) -> DiscountRate {
        match self {
            Cadence::OneTime => DiscountRate::from_bps(0),
            Cadence::Weekly => DiscountRate::from_bps(500),
            Cadence::Monthly => DiscountRate::from_bps(800),
        }
    }

    /// Whether this cadence creates a recurring subscription.
    ///
    /// After settlement the UI routes recurring orders to subscription
    /// tracking and one-time orders to order confirmation.
    #[inline]
    pub const fn is_recurring(&self) -> bool {
        !matches!(self, Cadence::OneTime)
    }

    /// The storefront option id for this cadence.
    pub const fn label(&self) -> &'static str {
        match self {
            Cadence::OneTime => "one-time",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses storefront option ids, including the legacy prefixed forms the
/// subscription picker used to emit (`"subscription-weekly"` etc.).
///
/// Anything outside the closed set is rejected with
/// [`CoreError::InvalidCadence`] before any state changes.
impl FromStr for Cadence {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "one-time" => Ok(Cadence::OneTime),
            "weekly" | "subscription-weekly" => Ok(Cadence::Weekly),
            "monthly" | "subscription-monthly" => Ok(Cadence::Monthly),
            other => Err(CoreError::InvalidCadence(other.to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_schedule() {
        assert_eq!(Cadence::OneTime.discount_rate().bps(), 0);
        assert_eq!(Cadence::Weekly.discount_rate().bps(), 500);
        assert_eq!(Cadence::Monthly.discount_rate().bps(), 800);
    }

    #[test]
    fn test_recurring() {
        assert!(!Cadence::OneTime.is_recurring());
        assert!(Cadence::Weekly.is_recurring());
        assert!(Cadence::Monthly.is_recurring());
    }

    #[test]
    fn test_parse_option_ids() {
        assert_eq!("one-time".parse::<Cadence>().unwrap(), Cadence::OneTime);
        assert_eq!("weekly".parse::<Cadence>().unwrap(), Cadence::Weekly);
        assert_eq!("monthly".parse::<Cadence>().unwrap(), Cadence::Monthly);

        // Legacy prefixed ids from the original subscription picker
        assert_eq!(
            "subscription-weekly".parse::<Cadence>().unwrap(),
            Cadence::Weekly
        );
        assert_eq!(
            "subscription-monthly".parse::<Cadence>().unwrap(),
            Cadence::Monthly
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "fortnightly".parse::<Cadence>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidCadence(ref label) if label == "fortnightly"));
    }

    #[test]
    fn test_default_is_one_time() {
        assert_eq!(Cadence::default(), Cadence::OneTime);
    }

    #[test]
    fn test_serializes_as_storefront_option_id() {
        // The frontend radio group binds directly to these ids
        assert_eq!(
            serde_json::to_value(Cadence::OneTime).unwrap(),
            serde_json::json!("one-time")
        );
        assert_eq!(
            serde_json::to_value(Cadence::Monthly).unwrap(),
            serde_json::json!("monthly")
        );
    }
}
