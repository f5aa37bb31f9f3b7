//! Order Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{addresses::models::Address, payments::models::PaymentMethod};

/// Order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
}

/// Order status parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised order status \"{0}\"")]
pub struct InvalidOrderStatus(pub String);

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "Shipped" => Ok(Self::Shipped),
            "Out for delivery" => Ok(Self::OutForDelivery),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(InvalidOrderStatus(other.to_string())),
        }
    }
}

/// Shipping address snapshot. Fields are copied from the address record at
/// placement time so later edits never rewrite order history.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingAddress {
    pub complete_address: String,
    pub landmark: Option<String>,
    pub pincode: String,
    pub city: String,
    pub state: String,
}

impl From<Address> for ShippingAddress {
    fn from(address: Address) -> Self {
        Self {
            complete_address: address.complete_address,
            landmark: address.landmark,
            pincode: address.pincode,
            city: address.city,
            state: address.state,
        }
    }
}

/// Order line snapshot: name and price are copied, not referenced, so the
/// customer pays exactly what the cart showed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_uuid: Uuid,
    pub name: String,
    /// Canonical quantity.
    pub quantity: Decimal,
    pub price: Decimal,
}

/// One entry in the append-only progress history.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    pub status: OrderStatus,
    pub note: Option<String>,
    pub recorded_at: Timestamp,
}

/// Order Model
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: Uuid,
    /// Human-readable daily-scoped id, e.g. `ORD-20250301-0042`.
    pub order_id: String,
    pub user_uuid: Uuid,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub coupon_discount: Decimal,
    pub delivery_fee: Decimal,
    /// Fixed at creation; never recomputed.
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping: ShippingAddress,
    pub progress: Vec<ProgressEntry>,
    /// Six digits, shown to the customer and checked by the delivery agent
    /// as proof of delivery.
    pub delivery_otp: String,
    pub delivery_agent_uuid: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A request to place an order from the user's current cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceOrder {
    pub user_uuid: Uuid,
    pub address_uuid: Uuid,
    pub method: PaymentMethod,
    /// The total the client showed the customer. The server recomputes the
    /// authoritative amount from the cart snapshot and rejects a mismatch.
    pub expected_total: Decimal,
}

/// Identifiers and signature delivered by the payment gateway's callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCallback {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}
