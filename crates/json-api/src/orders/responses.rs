//! Order response payloads shared by the order and payment handlers.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::orders::models::{Order, OrderItem, ProgressEntry, ShippingAddress};

use crate::extensions::*;

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Human-readable daily-scoped order id
    pub order_id: String,

    pub user_uuid: Uuid,

    pub items: Vec<OrderItemResponse>,

    pub subtotal: f64,
    pub coupon_discount: f64,
    pub delivery_fee: f64,
    pub total_amount: f64,

    /// Current status
    pub status: String,

    pub shipping_address: ShippingAddressResponse,

    /// Append-only status history
    pub progress: Vec<ProgressEntryResponse>,

    /// Proof-of-delivery OTP; only returned for offline payment methods at
    /// placement time
    pub delivery_otp: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid,
            order_id: order.order_id,
            user_uuid: order.user_uuid,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            subtotal: order.subtotal.to_f64_lossy(),
            coupon_discount: order.coupon_discount.to_f64_lossy(),
            delivery_fee: order.delivery_fee.to_f64_lossy(),
            total_amount: order.total_amount.to_f64_lossy(),
            status: order.status.to_string(),
            shipping_address: order.shipping.into(),
            progress: order
                .progress
                .into_iter()
                .map(ProgressEntryResponse::from)
                .collect(),
            delivery_otp: Some(order.delivery_otp),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,

    /// Name snapshot taken at placement time
    pub name: String,

    /// Canonical quantity
    pub quantity: f64,

    /// Price snapshot; exactly what the cart displayed
    pub price: f64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_uuid: item.product_uuid,
            name: item.name,
            quantity: item.quantity.to_f64_lossy(),
            price: item.price.to_f64_lossy(),
        }
    }
}

/// Shipping Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressResponse {
    pub complete_address: String,
    pub landmark: Option<String>,
    pub pincode: String,
    pub city: String,
    pub state: String,
}

impl From<ShippingAddress> for ShippingAddressResponse {
    fn from(shipping: ShippingAddress) -> Self {
        Self {
            complete_address: shipping.complete_address,
            landmark: shipping.landmark,
            pincode: shipping.pincode,
            city: shipping.city,
            state: shipping.state,
        }
    }
}

/// Progress Entry Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProgressEntryResponse {
    pub status: String,
    pub note: Option<String>,
    pub recorded_at: String,
}

impl From<ProgressEntry> for ProgressEntryResponse {
    fn from(entry: ProgressEntry) -> Self {
        Self {
            status: entry.status.to_string(),
            note: entry.note,
            recorded_at: entry.recorded_at.to_string(),
        }
    }
}
