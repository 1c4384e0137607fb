//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are whole Colombian pesos (COP) with no minor unit.
//! The store is single-currency, so `Price` carries the amount only.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in whole Colombian pesos.
///
/// Wraps a [`Decimal`] so intermediate percent math keeps full
/// precision; every public conversion back to pesos rounds half-up
/// (`MidpointAwayFromZero`), matching how the catalog rounds discounted
/// prices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero pesos.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole peso amount.
    #[must_use]
    pub fn from_pesos(pesos: i64) -> Self {
        Self(Decimal::from(pesos))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Whether the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Apply a percentage discount, rounded half-up to the whole peso
    /// and floored at zero.
    #[must_use]
    pub fn percent_off(&self, percent: Decimal) -> Self {
        let factor = Decimal::ONE - percent / Decimal::ONE_HUNDRED;
        let discounted = (self.0 * factor)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self(discounted.max(Decimal::ZERO))
    }

    /// Round to the whole peso, half-up.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Format as an es-CO amount with `.` digit grouping (no symbol),
    /// e.g. `45.000`.
    #[must_use]
    pub fn format_cop(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let digits = rounded.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let chars: Vec<char> = digits.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            if i > 0 && (chars.len() - i).is_multiple_of(3) {
                grouped.push('.');
            }
            grouped.push(*c);
        }
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{grouped}")
        } else {
            grouped
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_cop())
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}
