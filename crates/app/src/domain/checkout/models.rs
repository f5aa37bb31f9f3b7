//! Checkout Models

use mandi_core::{Unit, pricing};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{addresses::models::Address, catalog::models::StockIssue};

/// The money box shown before payment: cart subtotal, discount, delivery fee
/// and the resulting total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSummary {
    pub subtotal: Decimal,
    pub coupon_discount: Decimal,
    pub delivery_fee: Decimal,
    pub total_amount: Decimal,
}

impl PaymentSummary {
    /// Derive the summary from a live subtotal; the delivery fee is a step
    /// function of it.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal, coupon_discount: Decimal) -> Self {
        let delivery_fee = pricing::delivery_fee(subtotal);

        Self {
            subtotal,
            coupon_discount,
            delivery_fee,
            total_amount: pricing::order_total(subtotal, coupon_discount, delivery_fee),
        }
    }
}

/// One cart line as presented at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub product_uuid: Uuid,
    pub name: String,
    /// Canonical quantity.
    pub quantity: Decimal,
    pub unit: Unit,
    /// The stored snapshot price; exactly what the cart shows.
    pub line_price: Decimal,
}

/// Everything the client needs to render the checkout page. Ephemeral, never
/// persisted.
#[derive(Debug, Clone)]
pub struct CheckoutSummary {
    /// The user's default delivery address; `None` means the UI must prompt
    /// for one.
    pub address: Option<Address>,
    pub items: Vec<SummaryLine>,
    pub payment: PaymentSummary,
}

/// Outcome of the pre-order stock gate.
#[derive(Debug, Clone)]
pub struct CheckoutValidation {
    pub is_valid: bool,
    /// Itemised problems; empty means checkout may proceed.
    pub issues: Vec<StockIssue>,
    pub payment: PaymentSummary,
}

/// Standalone delivery-fee quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryFeeQuote {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub free_delivery_threshold: Decimal,
    pub is_free: bool,
}
