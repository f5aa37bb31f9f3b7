//! Customer-facing units and the canonical storage unit.
//!
//! Stock and cart quantities are persisted in kilograms (litres pass through
//! unchanged, they share the scale). Customers may order in grams, kilograms
//! or litres; conversion happens at the edge and everything downstream works
//! on canonical quantities.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decimal places kept for canonical quantities.
pub const QUANTITY_SCALE: u32 = 3;

/// Decimal places kept for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// A unit a customer can order in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Grams; converted to kilograms for storage.
    #[serde(rename = "gms")]
    Grams,
    /// Kilograms; the canonical unit.
    #[serde(rename = "kg")]
    Kilograms,
    /// Litres; stored as-is, same scale as kilograms.
    #[serde(rename = "ltr")]
    Litres,
}

/// Unit parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised unit \"{0}\", expected one of gms, kg, ltr")]
pub struct InvalidUnit(pub String);

impl Unit {
    /// The wire/display form of the unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grams => "gms",
            Self::Kilograms => "kg",
            Self::Litres => "ltr",
        }
    }

    /// Convert a quantity in this unit to the canonical storage unit.
    ///
    /// The result is truncated to [`QUANTITY_SCALE`] decimals; fractions of a
    /// gram are never rounded up into a charge.
    #[must_use]
    pub fn to_canonical(self, quantity: Decimal) -> Decimal {
        match self {
            Self::Grams => truncate(quantity / Decimal::ONE_THOUSAND, QUANTITY_SCALE),
            Self::Kilograms | Self::Litres => truncate(quantity, QUANTITY_SCALE),
        }
    }

    /// Convert a canonical quantity back to this unit for display.
    #[must_use]
    pub fn from_canonical(self, quantity: Decimal) -> Decimal {
        match self {
            Self::Grams => (quantity * Decimal::ONE_THOUSAND).normalize(),
            Self::Kilograms | Self::Litres => quantity.normalize(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = InvalidUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gms" => Ok(Self::Grams),
            "kg" => Ok(Self::Kilograms),
            "ltr" => Ok(Self::Litres),
            other => Err(InvalidUnit(other.to_string())),
        }
    }
}

/// Truncate to `decimals` places, discarding the remainder.
///
/// The value is first rounded at one extra place so that representation noise
/// (e.g. `0.299999…` for an intended `0.3`) does not truncate a whole step
/// down.
#[must_use]
pub fn truncate(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp(decimals + 1).trunc_with_scale(decimals)
}

/// Round up (away from zero) to `decimals` places.
///
/// Used for monetary amounts only: a fractional paisa always rounds to the
/// next whole one. Representation noise is neutralised at one extra place
/// before ceiling, as in [`truncate`].
#[must_use]
pub fn round_up(value: Decimal, decimals: u32) -> Decimal {
    value
        .round_dp(decimals + 1)
        .round_dp_with_strategy(decimals, RoundingStrategy::AwayFromZero)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("test literal must be a valid decimal")
    }

    #[test]
    fn grams_convert_to_kilograms() {
        assert_eq!(Unit::Grams.to_canonical(dec("500")), dec("0.5"));
        assert_eq!(Unit::Grams.to_canonical(dec("300")), dec("0.3"));
        assert_eq!(Unit::Grams.to_canonical(dec("1500")), dec("1.5"));
    }

    #[test]
    fn kilograms_and_litres_pass_through() {
        assert_eq!(Unit::Kilograms.to_canonical(dec("2")), dec("2"));
        assert_eq!(Unit::Litres.to_canonical(dec("1.25")), dec("1.25"));
    }

    #[test]
    fn sub_gram_fractions_truncate_rather_than_round() {
        // 1234.5678 g is 1.2345678 kg; anything past the third decimal is
        // dropped, never rounded up.
        assert_eq!(Unit::Grams.to_canonical(dec("1234.5678")), dec("1.234"));
    }

    #[test]
    fn round_trip_is_exact_within_quantity_scale() {
        for grams in ["250", "500", "1000", "2750"] {
            let canonical = Unit::Grams.to_canonical(dec(grams));
            assert_eq!(Unit::Grams.from_canonical(canonical), dec(grams));
        }

        // Gram inputs finer than the canonical scale come back truncated, but
        // always within one gram of the request.
        let canonical = Unit::Grams.to_canonical(dec("1234.5678"));
        let back = Unit::Grams.from_canonical(canonical);
        assert!(dec("1234.5678") - back < Decimal::ONE);
    }

    #[test]
    fn truncate_neutralises_representation_noise() {
        assert_eq!(truncate(dec("0.2999999"), 3), dec("0.3"));
        assert_eq!(truncate(dec("0.2994"), 3), dec("0.299"));
    }

    #[test]
    fn round_up_always_favours_the_next_paisa() {
        assert_eq!(round_up(dec("40.661"), 2), dec("40.67"));
        assert_eq!(round_up(dec("40.665"), 2), dec("40.67"));
        assert_eq!(round_up(dec("40.66"), 2), dec("40.66"));
    }

    #[test]
    fn round_up_neutralises_noise_below_the_guard_digit() {
        // Residue past the guard digit is representation noise, not money.
        assert_eq!(round_up(dec("40.66004"), 2), dec("40.66"));
    }

    #[test]
    fn parses_known_units() -> TestResult {
        assert_eq!(Unit::from_str("gms")?, Unit::Grams);
        assert_eq!(Unit::from_str("kg")?, Unit::Kilograms);
        assert_eq!(Unit::from_str("ltr")?, Unit::Litres);

        Ok(())
    }

    #[test]
    fn rejects_unknown_units() {
        assert_eq!(Unit::from_str("lbs"), Err(InvalidUnit("lbs".to_string())));
    }
}
