//! Errors

use salvo::http::StatusError;
use tracing::error;

use mandi_app::domain::checkout::CheckoutServiceError;

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::EmptyCart => {
            StatusError::bad_request().brief("Cart is empty. Please add items to proceed to checkout.")
        }
        CheckoutServiceError::AddressNotFound => {
            StatusError::not_found().brief("Delivery address not found or does not belong to user")
        }
        CheckoutServiceError::Sql(source) => {
            error!("checkout operation failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
