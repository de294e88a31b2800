//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The storefront this engine serves prices everything in whole rupees    │
//! │  (₹55 for 500ml milk, ₹15 delivery fee) and rounds discounts to the     │
//! │  nearest rupee. So the smallest sensible unit here IS the rupee, and    │
//! │  every amount is an i64 count of rupees. Fractions only ever appear     │
//! │  transiently inside discount aggregation, in basis-point space, and     │
//! │  are rounded away exactly once (see pricing.rs).                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use milkrun_core::money::Money;
//!
//! // Create from whole rupees (the only constructor)
//! let price = Money::from_rupees(55); // ₹55
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // ₹110
//! let total = price + Money::from_rupees(15);     // ₹70
//!
//! // NEVER do this:
//! // let bad = Money::from_float(54.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole rupees.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate discount arithmetic may dip negative;
///   totals returned to callers are clamped non-negative by the engine
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use milkrun_core::money::Money;
    ///
    /// let price = Money::from_rupees(55);
    /// assert_eq!(price.rupees(), 55);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees)
    }

    /// Returns the value in whole rupees.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use milkrun_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(65); // Greek yogurt, 400g
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.rupees(), 130);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Clamps the value to zero when negative.
    ///
    /// Stacked subscription discounts can in theory exceed subtotal plus
    /// delivery fee; a negative payable amount is never meaningful, so the
    /// pricing engine clamps the final total through this method.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. The UI host formats currency for actual
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}", sign, self.0.abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
