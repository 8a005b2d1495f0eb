//! Exact-decimal monetary value.
//!
//! Unit prices and cart totals are held as exact decimals; presentation
//! rounding is left to the serialization layer.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store's single currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps a raw decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the raw decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is strictly below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies this amount by an integer quantity.
    #[must_use]
    pub fn times(self, quantity: i64) -> Money {
        Money(self.0 * Decimal::from(quantity))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_times_scales_by_quantity() {
        let unit = Money::new(dec("15.50"));

        assert_eq!(unit.times(2), Money::new(dec("31.00")));
        assert_eq!(unit.times(5), Money::new(dec("77.50")));
    }

    #[test]
    fn test_sum_of_amounts() {
        let total: Money = [Money::new(dec("1.25")), Money::new(dec("2.75"))]
            .into_iter()
            .sum();

        assert_eq!(total, Money::new(dec("4.00")));
    }

    #[test]
    fn test_is_negative() {
        assert!(Money::new(dec("-0.01")).is_negative());
        assert!(!Money::ZERO.is_negative());
        assert!(!Money::new(dec("0.01")).is_negative());
    }
}
