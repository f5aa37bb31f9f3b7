//! Checkout Validation Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::checkout::models::CheckoutValidation;

use crate::{
    checkout::{
        errors::into_status_error,
        responses::{PaymentSummaryResponse, StockIssueResponse},
    },
    extensions::*,
    state::State,
};

/// Validate Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateCheckoutRequest {
    pub user_uuid: Uuid,
    pub address_uuid: Uuid,
}

/// Checkout Validation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutValidationResponse {
    /// Whether checkout may proceed
    pub is_valid: bool,

    /// Itemised stock problems; empty when valid
    pub stock_issues: Vec<StockIssueResponse>,

    pub payment: PaymentSummaryResponse,
}

impl From<CheckoutValidation> for CheckoutValidationResponse {
    fn from(validation: CheckoutValidation) -> Self {
        Self {
            is_valid: validation.is_valid,
            stock_issues: validation
                .issues
                .into_iter()
                .map(StockIssueResponse::from)
                .collect(),
            payment: validation.payment.into(),
        }
    }
}

/// Checkout Validation Handler
///
/// Re-checks every cart line against current stock without mutating the
/// cart. Issues are reported as a structured list, not as an error.
#[endpoint(
    tags("checkout"),
    summary = "Validate Checkout",
    responses(
        (status_code = StatusCode::OK, description = "Validation result"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart is empty"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateCheckoutRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutValidationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let validation = state
        .app
        .checkout
        .validate(request.user_uuid, request.address_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(validation.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use mandi_app::domain::{
        catalog::models::{StockIssue, StockIssueKind},
        checkout::{
            CheckoutServiceError, MockCheckoutService,
            models::{CheckoutValidation, PaymentSummary},
        },
    };

    use crate::test_helpers::{checkout_service, dec};

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        checkout_service(
            checkout,
            Router::with_path("checkout/validate").post(handler),
        )
    }

    #[tokio::test]
    async fn test_validate_reports_issues_with_200() -> TestResult {
        let mut checkout = MockCheckoutService::new();
        let user = Uuid::now_v7();
        let address = Uuid::now_v7();
        let product = Uuid::now_v7();

        let validation = CheckoutValidation {
            is_valid: false,
            issues: vec![StockIssue {
                product_uuid: product,
                name: Some("Tomatoes".to_string()),
                kind: StockIssueKind::Insufficient {
                    available: dec("2"),
                    requested: dec("5"),
                },
            }],
            payment: PaymentSummary::from_subtotal(dec("200"), Decimal::ZERO),
        };

        checkout
            .expect_validate()
            .once()
            .withf(move |u, a| *u == user && *a == address)
            .return_once(move |_, _| Ok(validation));

        let mut res = TestClient::post("http://example.com/checkout/validate")
            .json(&json!({ "user_uuid": user, "address_uuid": address }))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CheckoutValidationResponse = res.take_json().await?;
        assert!(!body.is_valid);
        assert_eq!(body.stock_issues.len(), 1);
        assert_eq!(body.stock_issues[0].product_uuid, product);
        assert!(body.stock_issues[0].issue.contains("only has 2 in stock"));

        Ok(())
    }

    #[tokio::test]
    async fn test_validate_unknown_address_returns_404() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_validate()
            .once()
            .return_once(|_, _| Err(CheckoutServiceError::AddressNotFound));

        let res = TestClient::post("http://example.com/checkout/validate")
            .json(&json!({ "user_uuid": Uuid::now_v7(), "address_uuid": Uuid::now_v7() }))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
