//! # Money Module
//!
//! Provides the `Money` type for Vietnamese đồng amounts.
//!
//! ## Why Integer Đồng?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  VND has no minor unit in circulation: prices are whole đồng.          │
//! │                                                                         │
//! │    net_price = 125_000 ₫   quantity = 3                                 │
//! │    line total = 375_000 ₫  (exact, no rounding ever needed)             │
//! │                                                                         │
//! │  Floating point would turn 0.1 + 0.2 style errors into invoice         │
//! │  mismatches against the supplier's paperwork.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overflow
//! Quantities have no upper bound, so line totals and sums use checked
//! arithmetic. `None` means the amount does not fit in an `i64` and the
//! caller reports it as an out-of-range value.
//!
//! ## Usage
//! ```rust
//! use kho_core::money::Money;
//!
//! let net_price = Money::from_dong(125_000);
//! let line_total = net_price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line_total.dong(), 375_000);
//! assert_eq!(line_total.to_string(), "375.000 ₫");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole đồng.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from đồng.
    #[inline]
    pub const fn from_dong(dong: i64) -> Self {
        Money(dong)
    }

    /// Returns the value in đồng.
    #[inline]
    pub const fn dong(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Unit price × quantity, `None` on overflow.
    ///
    /// ```rust
    /// use kho_core::money::Money;
    ///
    /// let unit = Money::from_dong(45_000);
    /// assert_eq!(unit.checked_multiply_quantity(5), Some(Money::from_dong(225_000)));
    /// assert_eq!(unit.checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Vietnamese formatting: dot thousands separator, trailing `₫`.
///
/// ```rust
/// use kho_core::money::Money;
///
/// assert_eq!(Money::from_dong(1_234_567).to_string(), "1.234.567 ₫");
/// assert_eq!(Money::from_dong(-50_000).to_string(), "-50.000 ₫");
/// ```
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{} ₫", sign, grouped)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
