//! Checkout Summary Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::checkout::models::CheckoutSummary;

use crate::{
    checkout::{
        errors::into_status_error,
        responses::{AddressResponse, PaymentSummaryResponse, SummaryLineResponse},
    },
    extensions::*,
    state::State,
};

/// Checkout Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutSummaryResponse {
    /// The user's default delivery address; absent means the client must
    /// prompt for one
    pub address: Option<AddressResponse>,

    /// The cart lines as they will be ordered
    pub items: Vec<SummaryLineResponse>,

    /// Subtotal, discount, delivery fee and total
    pub payment: PaymentSummaryResponse,
}

impl From<CheckoutSummary> for CheckoutSummaryResponse {
    fn from(summary: CheckoutSummary) -> Self {
        Self {
            address: summary.address.map(AddressResponse::from),
            items: summary
                .items
                .into_iter()
                .map(SummaryLineResponse::from)
                .collect(),
            payment: summary.payment.into(),
        }
    }
}

/// Checkout Summary Handler
///
/// Returns the checkout page data for the user's cart.
#[endpoint(
    tags("checkout"),
    summary = "Get Checkout Summary",
    responses(
        (status_code = StatusCode::OK, description = "Checkout summary"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart is empty"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user_uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CheckoutSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let summary = state
        .app
        .checkout
        .summary(user_uuid.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}
