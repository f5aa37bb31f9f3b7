//! Cart Models

use jiff::Timestamp;
use mandi_core::Unit;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Cart Model
#[derive(Debug, Clone)]
pub struct Cart {
    pub user_uuid: Uuid,
    pub items: Vec<CartItem>,
    pub coupon_discount: Decimal,
    /// Sum of stored line prices; refreshed on every mutation and read.
    pub subtotal: Decimal,
    /// Number of lines.
    pub total_items: i64,
    /// Subtotal minus coupon discount. Delivery fees are added at checkout.
    pub total_amount: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_uuid: Uuid,
    /// Quantity in the canonical unit.
    pub quantity: Decimal,
    /// Unit the customer chose; used when echoing quantities back.
    pub unit: Unit,
    /// Price snapshot taken the last time this line was touched. Summed into
    /// the subtotal as stored, never recomputed from the live product except
    /// when the line itself is mutated or clamped.
    pub line_price: Decimal,
}

/// A requested change to one cart line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineChange {
    pub product_uuid: Uuid,
    /// Quantity in `unit`. For `add_item` this is a delta (negative removes
    /// that magnitude); for `update_quantity` it is the absolute new value.
    pub quantity: Decimal,
    pub unit: Unit,
}

/// Result of a cart read: the cleaned cart plus any adjustments made to it.
///
/// The messages are informational, not errors; an empty list means the cart
/// matched the live catalog exactly.
#[derive(Debug, Clone)]
pub struct CartView {
    pub cart: Cart,
    pub adjustments: Vec<String>,
}

/// Result of a cart mutation.
#[derive(Debug, Clone)]
pub struct CartMutation {
    pub cart: Cart,
    /// The quantity the line ended up at, in the unit of the request. May be
    /// lower than asked when stock clamped it, or zero when the line was
    /// removed.
    pub effective_quantity: Decimal,
    /// Set when the outcome differs from the literal request.
    pub message: Option<String>,
}
