//! Decimal conversions at the JSON boundary.
//!
//! Wire payloads carry plain JSON numbers; the domain works on
//! `rust_decimal::Decimal`. Inbound values are cleaned of float
//! representation noise at one place past the relevant scale, the same
//! neutralisation the core rounding policies apply.

use mandi_core::units::{MONEY_SCALE, QUANTITY_SCALE, truncate};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use salvo::prelude::StatusError;

/// Parse a quantity from the wire.
pub(crate) fn parse_quantity(value: f64) -> Result<Decimal, StatusError> {
    let parsed = Decimal::from_f64_retain(value)
        .ok_or_else(|| StatusError::bad_request().brief("quantity must be a finite number"))?;

    Ok(truncate(parsed, QUANTITY_SCALE + 1))
}

/// Parse a monetary amount from the wire.
pub(crate) fn parse_money(value: f64) -> Result<Decimal, StatusError> {
    let parsed = Decimal::from_f64_retain(value)
        .ok_or_else(|| StatusError::bad_request().brief("amount must be a finite number"))?;

    Ok(truncate(parsed, MONEY_SCALE))
}

/// Outbound conversion for response payloads.
pub(crate) trait DecimalExt {
    fn to_f64_lossy(&self) -> f64;
}

impl DecimalExt for Decimal {
    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or_default()
    }
}
