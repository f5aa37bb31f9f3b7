//! Update Cart Item Quantity Handler

use std::{str::FromStr as _, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::carts::models::LineChange;
use mandi_core::Unit;

use crate::{
    carts::{errors::into_status_error, handlers::add::CartMutationResponse},
    extensions::*,
    state::State,
};

/// Update Cart Item Quantity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateQuantityRequest {
    pub user_uuid: Uuid,
    pub product_uuid: Uuid,
    /// The absolute new quantity in `unit`. Zero removes the line; negative
    /// values are rejected.
    pub quantity: f64,
    /// One of `gms`, `kg`, `ltr`
    pub unit: String,
    /// `consumer` (default) or `business`
    pub tier: Option<String>,
}

/// Update Cart Item Quantity Handler
///
/// Sets a cart line to an absolute quantity, subject to the same packaging
/// minimum and stock clamp rules as adding.
#[endpoint(
    tags("carts"),
    summary = "Update Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Negative quantity, invalid unit, or below the packaging minimum"),
        (status_code = StatusCode::NOT_FOUND, description = "Product or cart line not found"),
        (status_code = StatusCode::CONFLICT, description = "Product out of stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateQuantityRequest>,
    depot: &mut Depot,
) -> Result<Json<CartMutationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let unit = Unit::from_str(&request.unit)
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;
    let tier = parse_tier(request.tier.as_deref())?;
    let quantity = parse_quantity(request.quantity)?;

    let mutation = state
        .app
        .carts
        .update_quantity(
            request.user_uuid,
            tier,
            LineChange {
                product_uuid: request.product_uuid,
                quantity,
                unit,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(mutation.into()))
}
