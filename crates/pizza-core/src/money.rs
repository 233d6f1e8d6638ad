//! # Money Module
//!
//! Provides the `Money` type for topping surcharges.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Extra unit cost arrives as a decimal ("20.00", "12.5")                 │
//! │                                                                         │
//! │  parse_decimal() ──► 2000 cents / 1250 cents                            │
//! │                                                                         │
//! │  surcharge = extra_units × cents   (integer × integer, exact)           │
//! │                                                                         │
//! │  Rounding happens ONCE, at the decimal boundary, half-up to 2 places.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pizza_core::money::Money;
//!
//! let unit_cost = Money::parse_decimal("20.00").unwrap();
//! assert_eq!(unit_cost.cents(), 2000);
//!
//! let surcharge = unit_cost.multiply_units(3).unwrap();
//! assert_eq!(surcharge.to_string(), "$60.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values are representable so that the
///   configuration boundary can reject them with a proper error
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use pizza_core::money::Money;
    ///
    /// let cost = Money::from_cents(2000); // $20.00
    /// assert_eq!(cost.cents(), 2000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal string into money, rounding half-up to two places.
    ///
    /// ## Accepted Forms
    /// - `"20"`, `"20.5"`, `"20.50"`, `"-3.25"`, `"0.005"`
    /// - Surrounding whitespace is ignored
    ///
    /// ## Rounding
    /// Digits past the second decimal place are rounded half-up, away from
    /// zero: `"0.005"` → 1 cent, `"-0.005"` → -1 cent, `"0.0049"` → 0 cents.
    ///
    /// ```rust
    /// use pizza_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.345").unwrap().cents(), 1235);
    /// assert!(Money::parse_decimal("twelve").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> CoreResult<Money> {
        let text = input.trim();
        let invalid = |reason: &str| CoreError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected a decimal number"));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };

        let mut digits = fraction.chars().map(|c| i64::from(c as u8 - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().map_or(false, |d| d >= 5);

        let cents = whole_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
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

    /// Returns the minor unit (cents) portion (always 0-99).
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a per-unit cost by a count of topping units.
    ///
    /// ## Errors
    /// - `CoreError::ChargeOverflow` when the product leaves the `i64` range
    ///
    /// ```rust
    /// use pizza_core::money::Money;
    ///
    /// let per_unit = Money::from_cents(2000);
    /// assert_eq!(per_unit.multiply_units(3).unwrap().cents(), 6000);
    /// ```
    pub fn multiply_units(&self, units: u32) -> CoreResult<Self> {
        self.0
            .checked_mul(i64::from(units))
            .map(Money)
            .ok_or_else(|| CoreError::ChargeOverflow(format!("{} x {} units", self, units)))
    }
}

/// Display for logs and flag messages, not localized UI.
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

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
