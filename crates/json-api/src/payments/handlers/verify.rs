//! Payment Verification Handler

use std::{str::FromStr as _, sync::Arc};

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::{
    orders::models::{GatewayCallback, PlaceOrder},
    payments::models::PaymentMethod,
};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::OrderResponse},
    state::State,
};

/// Verify Payment Request
///
/// The gateway callback payload plus the order fields the client submitted
/// at pre-authorisation time.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub user_uuid: Uuid,
    pub address_uuid: Uuid,
    /// One of `upi`, `card`, `netbanking`
    pub payment_method: String,
    /// The total shown to the customer; the server recomputes and verifies it
    pub expected_total: f64,
}

/// Payment Verification Handler
///
/// Authenticates the gateway callback signature, then places the order as
/// already paid in the same atomic transaction used for offline orders.
#[endpoint(
    tags("payments"),
    summary = "Verify Payment and Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Signature mismatch, empty cart, or total mismatch"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::CONFLICT, description = "Stock conflict"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyPaymentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let method = PaymentMethod::from_str(&request.payment_method)
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;
    let expected_total = parse_money(request.expected_total)?;

    let order = state
        .app
        .orders
        .verify_and_place(
            GatewayCallback {
                gateway_order_id: request.razorpay_order_id,
                gateway_payment_id: request.razorpay_payment_id,
                signature: request.razorpay_signature,
            },
            PlaceOrder {
                user_uuid: request.user_uuid,
                address_uuid: request.address_uuid,
                method,
                expected_total,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    let mut response = OrderResponse::from(order);
    response.delivery_otp = None;

    Ok(Json(response))
}
