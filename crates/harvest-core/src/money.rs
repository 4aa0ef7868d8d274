//! # Money Module
//!
//! Provides the `Money` type (integer cents) and `PreciseMoney`
//! (integer micro-cents) for handling monetary values safely.
//!
//! ## Where Rounding Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Unit price (Money, cents) × quantity ──► line total     exact         │
//! │  Σ line totals                        ──► subtotal       exact         │
//! │  subtotal × tax rate                  ──► tax            PreciseMoney  │
//! │  subtotal + tax                       ──► total          PreciseMoney  │
//! │                                                                         │
//! │  round_to_cents() ◄── ONLY at display or when writing an Order          │
//! │                                                                         │
//! │  $10.40 × 7% = 0.728 is carried as 72_800_000 micro-cents, never as     │
//! │  0.73 until the value leaves the ticket.                                │
//! │                                                                         │
//! │  cents × tax ppm = tax in micro-cents, so any rate with up to six       │
//! │  decimal places as a fraction (8.875% = 88_750 ppm) is exact.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use harvest_core::money::Money;
//!
//! let price = Money::from_cents(450); // $4.50
//! let line = price * 2;               // $9.00
//! assert_eq!(line.cents(), 900);
//! ```
//!
//! ## Overflow
//! Arithmetic saturates at the `i64` bounds instead of wrapping or panicking.
//! Menu validation caps prices at [`crate::validation::MAX_PRICE`], which keeps
//! every reachable ticket far below those bounds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

/// Micro-cents per cent.
pub const MICRO_CENTS_PER_CENT: i64 = 1_000_000;

/// Micro-cents per major currency unit.
pub const MICRO_CENTS_PER_UNIT: i64 = 100 * MICRO_CENTS_PER_CENT;

/// Clamps a wide intermediate back into `i64`.
#[inline]
fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// Catalog prices, line totals and subtotals are always whole cents, so they
/// are represented exactly with this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use harvest_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates Money from a decimal amount in major units, rounding to the
    /// nearest cent.
    ///
    /// Only used at the backend boundary, where the hosted tables store
    /// `numeric` prices that arrive as JSON numbers.
    ///
    /// ```rust
    /// use harvest_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_f64(5.25).cents(), 525);
    /// assert_eq!(Money::from_major_f64(2.95).cents(), 295);
    /// ```
    pub fn from_major_f64(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value as a decimal in major units (e.g. `10.4`).
    ///
    /// For JSON payloads only; never do arithmetic on the result.
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use harvest_core::money::Money;
    ///
    /// let muffin = Money::from_cents(295);
    /// assert_eq!(muffin.multiply_quantity(2).cents(), 590);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Calculates tax at full precision.
    ///
    /// `cents × ppm` is exactly the tax in micro-cents, so nothing is lost:
    /// 1040 cents at 70,000 ppm is 72,800,000 micro-cents ($0.728).
    ///
    /// ```rust
    /// use harvest_core::money::Money;
    /// use harvest_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(1040).calculate_tax(TaxRate::from_ppm(70_000));
    /// assert_eq!(tax.micro_cents(), 72_800_000);
    /// assert_eq!(tax.round_to_cents().cents(), 73);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> PreciseMoney {
        PreciseMoney::from_micro_cents(saturate(self.0 as i128 * rate.ppm() as i128))
    }

    /// Widens to a PreciseMoney with the same value.
    #[inline]
    pub fn to_precise(&self) -> PreciseMoney {
        PreciseMoney::from_micro_cents(self.0.saturating_mul(MICRO_CENTS_PER_CENT))
    }
}

/// Debug-friendly display. UI code formats through `CurrencyFormat`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// PreciseMoney Type
// =============================================================================

/// A monetary value in micro-cents (1/1,000,000 of a cent).
///
/// Holds derived values (tax, total) that must not be rounded until they
/// are displayed or persisted. The scale matches `cents × ppm`, so tax at
/// any representable [`TaxRate`] is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreciseMoney(i64);

impl PreciseMoney {
    #[inline]
    pub const fn from_micro_cents(micro_cents: i64) -> Self {
        PreciseMoney(micro_cents)
    }

    #[inline]
    pub const fn micro_cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        PreciseMoney(0)
    }

    /// Rounds to whole cents, half away from zero.
    ///
    /// ```rust
    /// use harvest_core::money::PreciseMoney;
    ///
    /// assert_eq!(PreciseMoney::from_micro_cents(1_112_800_000).round_to_cents().cents(), 1113);
    /// assert_eq!(PreciseMoney::from_micro_cents(500_000).round_to_cents().cents(), 1);
    /// assert_eq!(PreciseMoney::from_micro_cents(499_999).round_to_cents().cents(), 0);
    /// ```
    pub fn round_to_cents(&self) -> Money {
        let value = self.0 as i128;
        let per_cent = MICRO_CENTS_PER_CENT as i128;
        let half = per_cent / 2;
        let cents = if value >= 0 {
            (value + half) / per_cent
        } else {
            -((-value + half) / per_cent)
        };
        Money::from_cents(saturate(cents))
    }

    /// Value in major units as a float, for tolerance comparisons and charts.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / MICRO_CENTS_PER_UNIT as f64
    }
}

impl fmt::Display for PreciseMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.round_to_cents().fmt(f)
    }
}

impl Add for PreciseMoney {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        PreciseMoney(self.0.saturating_add(other.0))
    }
}

impl Sub for PreciseMoney {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        PreciseMoney(self.0.saturating_sub(other.0))
    }
}

impl From<Money> for PreciseMoney {
    fn from(money: Money) -> Self {
        money.to_precise()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
