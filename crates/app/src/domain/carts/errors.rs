//! Carts service errors.

use mandi_core::Unit;
use rust_decimal::Decimal;
use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must not be zero")]
    ZeroQuantity,

    #[error("quantity must not be negative")]
    NegativeQuantity,

    #[error("Minimum order is {minimum}{unit}. You entered {entered}{unit}.")]
    BelowMinimum {
        /// Packaging minimum, converted to the customer's unit.
        minimum: Decimal,
        /// What the customer asked for, in their unit.
        entered: Decimal,
        unit: Unit,
    },

    #[error("product not found")]
    ProductNotFound,

    #[error("product is out of stock")]
    OutOfStock,

    #[error("item not found in cart")]
    ItemNotFound,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::ItemNotFound;
        }

        Self::Sql(error)
    }
}
