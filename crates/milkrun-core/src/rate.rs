//! # Discount Rate Module
//!
//! Percentage discounts as structured basis points.
//!
//! ## Why Basis Points?
//! 1 basis point = 0.01% = 1/10000
//! 1000 bps = 10% (e.g., the daily line-subscription saving on yogurt)
//!
//! The catalog hands line-subscription savings to the storefront as strings
//! like `"10%"`. Parsing happens exactly once, at the catalog boundary, into
//! this type; everything downstream is integer math.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::validate_rate_bps;

/// A percentage discount in basis points (1000 = 10%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        DiscountRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

/// Parses catalog savings strings such as `"10%"` or `"8.5"`.
///
/// ## Example
/// ```rust
/// use milkrun_core::rate::DiscountRate;
///
/// let rate: DiscountRate = "10%".parse().unwrap();
/// assert_eq!(rate.bps(), 1000);
///
/// assert!("ten percent".parse::<DiscountRate>().is_err());
/// ```
impl FromStr for DiscountRate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%').trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "discount rate".to_string(),
            });
        }

        let pct: f64 = trimmed.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "discount rate".to_string(),
            reason: format!("'{}' is not a percentage", s.trim()),
        })?;

        if !pct.is_finite() || pct < 0.0 {
            return Err(ValidationError::InvalidFormat {
                field: "discount rate".to_string(),
                reason: "must be a non-negative percentage".to_string(),
            });
        }

        let bps = (pct * 100.0).round() as u32;
        validate_rate_bps(bps)?;

        Ok(DiscountRate(bps))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
