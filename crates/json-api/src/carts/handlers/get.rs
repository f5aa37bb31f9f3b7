//! Get Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::carts::models::CartView;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Cart View Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartViewResponse {
    /// The cart after revalidation against the live catalog
    pub cart: CartResponse,

    /// Human-readable descriptions of any adjustments made during the read.
    /// Empty when the cart matched the catalog exactly.
    pub adjustments: Vec<String>,
}

impl From<CartView> for CartViewResponse {
    fn from(view: CartView) -> Self {
        Self {
            cart: view.cart.into(),
            adjustments: view.adjustments,
        }
    }
}

/// Get Cart Handler
///
/// Returns the user's cart, creating it lazily, after dropping or clamping
/// lines the live catalog can no longer satisfy.
#[endpoint(tags("carts"), summary = "Get Cart")]
pub(crate) async fn handler(
    user_uuid: PathParam<Uuid>,
    tier: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartViewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tier = parse_tier(tier.into_inner().as_deref())?;

    let view = state
        .app
        .carts
        .get_cart(user_uuid.into_inner(), tier)
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}
