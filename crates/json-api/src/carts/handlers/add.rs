//! Add Cart Item Handler

use std::{str::FromStr as _, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::carts::models::{CartMutation, LineChange};
use mandi_core::Unit;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddItemRequest {
    pub user_uuid: Uuid,
    pub product_uuid: Uuid,
    /// Quantity in `unit`. A negative value removes that magnitude from an
    /// existing line.
    pub quantity: f64,
    /// One of `gms`, `kg`, `ltr`
    pub unit: String,
    /// `consumer` (default) or `business`
    pub tier: Option<String>,
}

/// Cart Mutation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartMutationResponse {
    /// The updated cart
    pub cart: CartResponse,

    /// The quantity the line ended up at, in the unit of the request
    pub effective_quantity: f64,

    /// Present when the outcome differs from the literal request, e.g. a
    /// stock clamp
    pub message: Option<String>,
}

impl From<CartMutation> for CartMutationResponse {
    fn from(mutation: CartMutation) -> Self {
        Self {
            cart: mutation.cart.into(),
            effective_quantity: mutation.effective_quantity.to_f64_lossy(),
            message: mutation.message,
        }
    }
}

/// Add Cart Item Handler
///
/// Adds a quantity of a product to the user's cart. Requests exceeding the
/// available stock succeed at a clamped quantity with an explanatory message.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or unit, or below the packaging minimum"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Product out of stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
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
        .add_item(
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
