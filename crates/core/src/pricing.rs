//! Discount resolution.
//!
//! The catalog carries three inconsistently-populated discount
//! representations: a direct override price, a free-text custom
//! attribute, and a percentage. Historically each view resolved them
//! ad hoc with subtly different fallback orders; this module is the
//! single canonical resolver every consumer goes through.
//!
//! Precedence, first valid match wins:
//!
//! 1. `discount_price` when `> 0` and `< price`
//! 2. a custom attribute whose label (case-folded, trimmed) is a
//!    recognized spelling of "discounted price", value parsed as a
//!    peso amount, when `> 0` and `< price`
//! 3. `discount_percent > 0`, applied to the base price and rounded
//!    half-up to the whole peso
//! 4. the base price
//!
//! Malformed discount data is never an error: an invalid candidate at
//! any tier falls through to the next one.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;

use crate::catalog::Product;
use crate::types::Price;

/// Recognized label spellings for the custom-attribute discount, after
/// case folding and trimming. The attribute is a fragile external
/// convention; keeping the match here means a future typed catalog
/// field only requires deleting tier 2.
const DISCOUNT_PRICE_LABELS: &[&str] =
    &["precio con descuento", "precio descuento", "descuento"];

/// The outcome of discount resolution for one product.
///
/// `unit_price` is the effective price to charge; the `*_seen` fields
/// record which discount representation produced it, for badge and
/// strike-through rendering. Both are `None` when no discount applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrice {
    pub unit_price: Price,
    pub discount_price_seen: Option<Price>,
    pub discount_percent_seen: Option<Decimal>,
}

impl ResolvedPrice {
    fn base(price: Price) -> Self {
        Self {
            unit_price: price,
            discount_price_seen: None,
            discount_percent_seen: None,
        }
    }

    /// Whether a discount actually lowered the price.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_price_seen.is_some() || self.discount_percent_seen.is_some()
    }
}

/// Resolve the effective unit price for a product.
///
/// Total over all inputs: dirty catalog data degrades to the base
/// price rather than failing.
#[must_use]
pub fn resolve_unit_price(product: &Product) -> ResolvedPrice {
    let base = product.price;

    // Tier 1: direct override price
    if let Some(amount) = product.discount_price {
        let candidate = Price::new(amount);
        if candidate > Price::ZERO && candidate < base {
            return ResolvedPrice {
                unit_price: candidate,
                discount_price_seen: Some(candidate),
                discount_percent_seen: None,
            };
        }
    }

    // Tier 2: "Precio con descuento" custom attribute
    if let Some(amount) = discount_from_attrs(product) {
        let candidate = Price::new(amount);
        if candidate > Price::ZERO && candidate < base {
            return ResolvedPrice {
                unit_price: candidate,
                discount_price_seen: Some(candidate),
                discount_percent_seen: None,
            };
        }
    }

    // Tier 3: percentage
    if let Some(percent) = product.discount_percent
        && percent > Decimal::ZERO
    {
        return ResolvedPrice {
            unit_price: base.percent_off(percent),
            discount_price_seen: None,
            discount_percent_seen: Some(percent),
        };
    }

    ResolvedPrice::base(base)
}

/// Read the discount price encoded as a custom attribute, if any.
///
/// Returns the parsed amount without validating it against the base
/// price; the resolver applies the `> 0 && < price` check.
#[must_use]
pub fn discount_from_attrs(product: &Product) -> Option<Decimal> {
    product
        .custom_attrs
        .iter()
        .find(|attr| is_discount_label(&attr.label))
        .and_then(|attr| parse_peso_amount(&attr.value))
}

fn is_discount_label(label: &str) -> bool {
    let folded = label.trim().to_lowercase();
    DISCOUNT_PRICE_LABELS.contains(&folded.as_str())
}

/// Parse a free-text peso amount by stripping every non-digit character
/// and reading the remainder as an integer: `"$45.000"` -> `45000`.
#[must_use]
pub fn parse_peso_amount(raw: &str) -> Option<Decimal> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<Decimal>().ok()
}

/// Badge percentage for a resolved discount, for listing views.
///
/// A percent-driven discount reports its own percentage; a price-driven
/// one derives `round((1 - final/base) * 100)`. `None` when there is no
/// discount or the derived percentage rounds to zero.
#[must_use]
pub fn badge_percent(base: Price, resolved: &ResolvedPrice) -> Option<u32> {
    if let Some(percent) = resolved.discount_percent_seen {
        return percent
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .filter(|p| *p > 0);
    }
    let final_price = resolved.discount_price_seen?;
    if base.is_zero() {
        return None;
    }
    let ratio = Decimal::ONE - final_price.amount() / base.amount();
    (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .filter(|p| *p > 0)
}
