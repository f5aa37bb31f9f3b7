//! Line pricing, tier selection and cart-level aggregates.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::{MONEY_SCALE, QUANTITY_SCALE, round_up, truncate};

/// Subtotal at or above which delivery is free.
#[must_use]
pub fn free_delivery_threshold() -> Decimal {
    Decimal::from(500)
}

/// Flat delivery fee charged below the free threshold.
#[must_use]
pub fn flat_delivery_fee() -> Decimal {
    Decimal::from(50)
}

/// Which of a product's two price fields applies to the caller.
///
/// Products carry parallel consumer and business prices; the tier is threaded
/// explicitly through every pricing call rather than read from ambient state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTier {
    /// Retail customer; pays the consumer price, sees only visible products.
    #[default]
    Consumer,
    /// B2B customer; pays the business price, sees the whole catalog.
    Business,
}

/// Tier parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised customer tier \"{0}\", expected consumer or business")]
pub struct InvalidTier(pub String);

impl CustomerTier {
    /// Pick the applicable price field.
    #[must_use]
    pub const fn select(self, consumer_price: Decimal, business_price: Decimal) -> Decimal {
        match self {
            Self::Consumer => consumer_price,
            Self::Business => business_price,
        }
    }
}

impl fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Consumer => "consumer",
            Self::Business => "business",
        })
    }
}

impl FromStr for CustomerTier {
    type Err = InvalidTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consumer" => Ok(Self::Consumer),
            "business" => Ok(Self::Business),
            other => Err(InvalidTier(other.to_string())),
        }
    }
}

/// Price a line: canonical quantity times per-kilogram price, rounded up to
/// the paisa.
#[must_use]
pub fn line_price(unit_price: Decimal, canonical_quantity: Decimal) -> Decimal {
    round_up(unit_price * canonical_quantity, MONEY_SCALE)
}

/// Cart-level aggregates derived from stored line prices.
///
/// The subtotal sums the snapshot prices as stored on each line; it is never
/// recomputed from live product prices here. Delivery fees are a checkout
/// concern and are not part of the cart total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of stored line prices.
    pub subtotal: Decimal,
    /// Number of lines in the cart.
    pub total_items: i64,
    /// `subtotal − coupon discount`, truncated to the quantity scale.
    pub total_amount: Decimal,
}

impl CartTotals {
    /// Aggregate stored line prices with the cart's coupon discount.
    pub fn compute<I>(line_prices: I, coupon_discount: Decimal) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut subtotal = Decimal::ZERO;
        let mut total_items = 0_i64;

        for price in line_prices {
            subtotal += price;
            total_items += 1;
        }

        Self {
            subtotal,
            total_items,
            total_amount: truncate(subtotal - coupon_discount, QUANTITY_SCALE),
        }
    }
}

/// Delivery fee as a step function of the subtotal: free at or above the
/// threshold, flat below it.
#[must_use]
pub fn delivery_fee(subtotal: Decimal) -> Decimal {
    if subtotal >= free_delivery_threshold() {
        Decimal::ZERO
    } else {
        flat_delivery_fee()
    }
}

/// The amount an order settles at: cart total plus the delivery fee fixed at
/// placement time. Computed once when the order is created, never after.
#[must_use]
pub fn order_total(subtotal: Decimal, coupon_discount: Decimal, delivery_fee: Decimal) -> Decimal {
    truncate(subtotal - coupon_discount, QUANTITY_SCALE) + delivery_fee
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("test literal must be a valid decimal")
    }

    #[test]
    fn line_price_rounds_up_to_the_paisa() {
        // 0.5 kg at 81.33/kg is 40.665, which charges as 40.67.
        assert_eq!(line_price(dec("81.33"), dec("0.5")), dec("40.67"));
        assert_eq!(line_price(dec("20"), dec("5")), dec("100"));
    }

    #[test]
    fn tier_selects_the_matching_price_field() {
        assert_eq!(
            CustomerTier::Consumer.select(dec("100"), dec("90")),
            dec("100")
        );
        assert_eq!(
            CustomerTier::Business.select(dec("100"), dec("90")),
            dec("90")
        );
    }

    #[test]
    fn tier_parses_and_rejects() {
        assert_eq!(
            CustomerTier::from_str("business"),
            Ok(CustomerTier::Business)
        );
        assert_eq!(
            CustomerTier::from_str("wholesale"),
            Err(InvalidTier("wholesale".to_string()))
        );
    }

    #[test]
    fn totals_sum_stored_line_prices() {
        let totals = CartTotals::compute([dec("40.67"), dec("100")], Decimal::ZERO);

        assert_eq!(totals.subtotal, dec("140.67"));
        assert_eq!(totals.total_items, 2);
        assert_eq!(totals.total_amount, dec("140.67"));
    }

    #[test]
    fn coupon_discount_reduces_the_total() {
        let totals = CartTotals::compute([dec("200")], dec("25.5"));

        assert_eq!(totals.subtotal, dec("200"));
        assert_eq!(totals.total_amount, dec("174.5"));
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let totals = CartTotals::compute([], Decimal::ZERO);

        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total_items, 0);
        assert_eq!(totals.total_amount, Decimal::ZERO);
    }

    #[test]
    fn delivery_fee_steps_at_the_threshold() {
        assert_eq!(delivery_fee(dec("499.99")), dec("50"));
        assert_eq!(delivery_fee(dec("500.00")), Decimal::ZERO);
        assert_eq!(delivery_fee(dec("500.01")), Decimal::ZERO);
    }

    #[test]
    fn order_total_adds_the_fee_after_the_discount() {
        assert_eq!(
            order_total(dec("499.99"), Decimal::ZERO, dec("50")),
            dec("549.99")
        );
        assert_eq!(order_total(dec("600"), dec("100"), Decimal::ZERO), dec("500"));
    }
}
