//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RemoveItemRequest {
    pub user_uuid: Uuid,
    pub product_uuid: Uuid,
}

/// Remove Cart Item Handler
///
/// Removes a line from the cart. Removing a product that is not in the cart
/// is not an error; the current cart is returned unchanged.
#[endpoint(
    tags("carts"),
    summary = "Remove Item from Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart returned"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RemoveItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let cart = state
        .app
        .carts
        .remove_item(request.user_uuid, request.product_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
