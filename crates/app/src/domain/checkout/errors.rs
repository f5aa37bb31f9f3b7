//! Checkout service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("address not found or does not belong to user")]
    AddressNotFound,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
