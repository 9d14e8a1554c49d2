//! # Money Module
//!
//! Provides the `Money` type used for every amount the engine touches:
//! gross amounts, tips, fees, net settlements and batch totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    1000.00 × 0.029 = 28.999999999999996  ❌                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer cents + basis-point rates                        │
//! │    100000 cents × 290 bps / 10000 = 2900 cents = $29.00  ✅             │
//! │                                                                         │
//! │  Floats only appear at the wire boundary (payterm-engine), where they   │
//! │  are converted to cents once and rendered back with 2 decimals.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use payterm_core::money::Money;
//! use payterm_core::types::Rate;
//!
//! let gross = Money::from_cents(100_000); // $1000.00
//! let fee = gross.apply_rate(Rate::from_bps(290)); // 2.90%
//! assert_eq!(fee.cents(), 2_900);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that refunds and negative net settlements (a fee larger than a
/// zero-value sale) stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use payterm_core::money::Money;
    ///
    /// let tip = Money::from_cents(250); // $2.50
    /// assert_eq!(tip.cents(), 250);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    ///
    /// ```rust
    /// use payterm_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(970, 85).cents(), 97_085);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a basis-point rate, rounding half away from zero to the cent.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount * bps ± 5000) / 10000`.
    /// The ±5000 is half of the divisor, signed like the product so that
    /// -$0.005 rounds to -$0.01 just as $0.005 rounds to $0.01.
    ///
    /// ```rust
    /// use payterm_core::money::Money;
    /// use payterm_core::types::Rate;
    ///
    /// // $10.10 at 2.50% = $0.2525 → $0.25
    /// assert_eq!(Money::from_cents(1010).apply_rate(Rate::from_bps(250)).cents(), 25);
    /// // $10.30 at 2.50% = $0.2575 → $0.26
    /// assert_eq!(Money::from_cents(1030).apply_rate(Rate::from_bps(250)).cents(), 26);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        Money::from_cents(round_div_i128(product, 10_000) as i64)
    }

    /// Returns the value in major units as a float.
    ///
    /// Only for rendering at the display/wire boundary; never feed the result
    /// back into calculations.
    #[inline]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Integer division rounding half away from zero.
///
/// `divisor` must be positive.
pub(crate) fn round_div_i128(numerator: i128, divisor: i128) -> i128 {
    let half = divisor / 2;
    if numerator >= 0 {
        (numerator + half) / divisor
    } else {
        (numerator - half) / divisor
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering (`$12.34`, `-$5.50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
