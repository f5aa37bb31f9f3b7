//! Create Order Handler

use std::{str::FromStr as _, sync::Arc};

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::{orders::models::PlaceOrder, payments::models::PaymentMethod};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::OrderResponse},
    state::State,
};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub user_uuid: Uuid,
    pub address_uuid: Uuid,
    /// One of `upi`, `card`, `netbanking`, `cod`, `credit`
    pub payment_method: String,
    /// The total shown to the customer; the server recomputes and verifies it
    pub expected_total: f64,
}

/// Create Order Handler
///
/// Places an order from the user's cart in one atomic transaction. Online
/// methods are pre-authorised with the gateway and settled via the payment
/// verification endpoint instead of here.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart, invalid method, or total mismatch"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::CONFLICT, description = "Stock conflict"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Placement timed out; retry"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
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
        .place_order(PlaceOrder {
            user_uuid: request.user_uuid,
            address_uuid: request.address_uuid,
            method,
            expected_total,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    let mut response = OrderResponse::from(order);

    // The OTP is proof of delivery; only hand it out when the order settles
    // offline at the doorstep.
    if !method.is_offline() {
        response.delivery_otp = None;
    }

    Ok(Json(response))
}
