//! Checkout response payloads.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::{
    addresses::models::Address,
    catalog::models::StockIssue,
    checkout::models::{PaymentSummary, SummaryLine},
};

use crate::extensions::*;

/// Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    pub uuid: Uuid,
    pub complete_address: String,
    pub landmark: Option<String>,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub nickname: Option<String>,
    pub is_default: bool,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            uuid: address.uuid,
            complete_address: address.complete_address,
            landmark: address.landmark,
            pincode: address.pincode,
            city: address.city,
            state: address.state,
            nickname: address.nickname,
            is_default: address.is_default,
        }
    }
}

/// Payment Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentSummaryResponse {
    pub subtotal: f64,
    pub coupon_discount: f64,
    pub delivery_fee: f64,
    pub total_amount: f64,
}

impl From<PaymentSummary> for PaymentSummaryResponse {
    fn from(payment: PaymentSummary) -> Self {
        Self {
            subtotal: payment.subtotal.to_f64_lossy(),
            coupon_discount: payment.coupon_discount.to_f64_lossy(),
            delivery_fee: payment.delivery_fee.to_f64_lossy(),
            total_amount: payment.total_amount.to_f64_lossy(),
        }
    }
}

/// Checkout Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SummaryLineResponse {
    pub product_uuid: Uuid,
    pub name: String,
    /// Canonical quantity
    pub quantity: f64,
    pub unit: String,
    pub line_price: f64,
}

impl From<SummaryLine> for SummaryLineResponse {
    fn from(line: SummaryLine) -> Self {
        Self {
            product_uuid: line.product_uuid,
            name: line.name,
            quantity: line.quantity.to_f64_lossy(),
            unit: line.unit.to_string(),
            line_price: line.line_price.to_f64_lossy(),
        }
    }
}

/// Stock Issue Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StockIssueResponse {
    pub product_uuid: Uuid,
    pub product_name: Option<String>,
    /// Human-readable description of the problem
    pub issue: String,
}

impl From<StockIssue> for StockIssueResponse {
    fn from(issue: StockIssue) -> Self {
        Self {
            product_uuid: issue.product_uuid,
            product_name: issue.name.clone(),
            issue: issue.to_string(),
        }
    }
}
