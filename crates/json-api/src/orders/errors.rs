//! Errors

use salvo::http::StatusError;
use tracing::error;

use mandi_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyCart => {
            StatusError::bad_request().brief("Cart is empty. Please add items to proceed to checkout.")
        }
        OrdersServiceError::AddressNotFound => {
            StatusError::not_found().brief("Delivery address not found or does not belong to user")
        }
        OrdersServiceError::StockConflict(issues) => {
            let detail = issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");

            StatusError::conflict()
                .brief("Some items in the cart have stock issues")
                .detail(detail)
        }
        OrdersServiceError::TotalMismatch { expected, actual } => StatusError::bad_request()
            .brief(format!(
                "order total mismatch: client sent {expected}, cart totals {actual}"
            )),
        OrdersServiceError::SignatureMismatch => {
            StatusError::bad_request().brief("Payment verification failed")
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Timeout => {
            StatusError::service_unavailable().brief("Order placement timed out, please retry")
        }
        OrdersServiceError::Sql(source) => {
            error!("order operation failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
