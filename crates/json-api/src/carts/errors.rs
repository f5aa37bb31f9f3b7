//! Errors

use salvo::http::StatusError;
use tracing::error;

use mandi_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::ZeroQuantity
        | CartsServiceError::NegativeQuantity
        | CartsServiceError::BelowMinimum { .. } => {
            StatusError::bad_request().brief(error.to_string())
        }
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::ItemNotFound => {
            StatusError::not_found().brief("Item not found in cart")
        }
        CartsServiceError::OutOfStock => StatusError::conflict().brief("Product is out of stock"),
        CartsServiceError::Sql(source) => {
            error!("cart operation failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
