//! Cart response payloads shared by the cart handlers.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mandi_app::domain::carts::models::{Cart, CartItem};

use crate::extensions::*;

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Owner of the cart
    pub user_uuid: Uuid,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// Coupon discount applied to the cart
    pub coupon_discount: f64,

    /// Sum of stored line prices
    pub subtotal: f64,

    /// Number of lines
    pub total_items: i64,

    /// Subtotal minus coupon discount
    pub total_amount: f64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            user_uuid: cart.user_uuid,
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            coupon_discount: cart.coupon_discount.to_f64_lossy(),
            subtotal: cart.subtotal.to_f64_lossy(),
            total_items: cart.total_items,
            total_amount: cart.total_amount.to_f64_lossy(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The product in this line
    pub product_uuid: Uuid,

    /// Quantity in the canonical unit (kilograms/litres)
    pub quantity: f64,

    /// The unit the customer ordered in
    pub unit: String,

    /// Quantity converted back to the customer's unit
    pub display_quantity: f64,

    /// Price snapshot taken when this line was last touched
    pub line_price: f64,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            product_uuid: item.product_uuid,
            quantity: item.quantity.to_f64_lossy(),
            unit: item.unit.to_string(),
            display_quantity: item.unit.from_canonical(item.quantity).to_f64_lossy(),
            line_price: item.line_price.to_f64_lossy(),
        }
    }
}
