//! Orders service errors.

use rust_decimal::Decimal;
use sqlx::Error;
use thiserror::Error;

use crate::domain::catalog::models::StockIssue;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("address not found or does not belong to user")]
    AddressNotFound,

    /// Stock moved between the cart snapshot and the placement transaction.
    /// The order is not created, nothing is decremented.
    #[error("some items in the cart have stock issues")]
    StockConflict(Vec<StockIssue>),

    #[error("order total mismatch: client sent {expected}, cart totals {actual}")]
    TotalMismatch { expected: Decimal, actual: Decimal },

    #[error("payment verification failed")]
    SignatureMismatch,

    #[error("order not found")]
    NotFound,

    /// The placement transaction exceeded its time budget while holding
    /// stock locks; it is aborted and may be retried.
    #[error("order placement timed out")]
    Timeout,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}
