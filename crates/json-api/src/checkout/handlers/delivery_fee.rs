//! Delivery Fee Quote Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::checkout::models::DeliveryFeeQuote;

use crate::{checkout::errors::into_status_error, extensions::*, state::State};

/// Delivery Fee Quote Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeliveryFeeResponse {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub free_delivery_threshold: f64,
    pub is_free_delivery: bool,
}

impl From<DeliveryFeeQuote> for DeliveryFeeResponse {
    fn from(quote: DeliveryFeeQuote) -> Self {
        Self {
            subtotal: quote.subtotal.to_f64_lossy(),
            delivery_fee: quote.delivery_fee.to_f64_lossy(),
            free_delivery_threshold: quote.free_delivery_threshold.to_f64_lossy(),
            is_free_delivery: quote.is_free,
        }
    }
}

/// Delivery Fee Quote Handler
///
/// Quotes the delivery fee for the user's cart as it stands.
#[endpoint(
    tags("checkout"),
    summary = "Get Delivery Fee",
    responses(
        (status_code = StatusCode::OK, description = "Fee quote"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart is empty"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user_uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<DeliveryFeeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let quote = state
        .app
        .checkout
        .delivery_fee_quote(user_uuid.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(quote.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use mandi_app::domain::checkout::MockCheckoutService;

    use crate::test_helpers::{checkout_service, dec};

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        checkout_service(
            checkout,
            Router::with_path("checkout/delivery-fee/{user_uuid}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_fee_quote_round_trips() -> TestResult {
        let mut checkout = MockCheckoutService::new();
        let user = Uuid::now_v7();

        checkout
            .expect_delivery_fee_quote()
            .once()
            .withf(move |u| *u == user)
            .return_once(|_| {
                Ok(DeliveryFeeQuote {
                    subtotal: dec("499.99"),
                    delivery_fee: dec("50"),
                    free_delivery_threshold: dec("500"),
                    is_free: false,
                })
            });

        let mut res = TestClient::get(format!("http://example.com/checkout/delivery-fee/{user}"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: DeliveryFeeResponse = res.take_json().await?;
        assert_eq!(body.subtotal, 499.99);
        assert_eq!(body.delivery_fee, 50.0);
        assert!(!body.is_free_delivery);

        Ok(())
    }
}
