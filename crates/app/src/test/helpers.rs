//! Seed-data helpers for service tests.

use mandi_core::Unit;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::catalog::models::NewProduct;

pub(crate) fn dec(s: &str) -> Decimal {
    s.parse().expect("test literal must be a valid decimal")
}

/// A product with both price tiers set to `price`, visible to consumers, and
/// a packaging minimum of one default unit. Tests tweak fields as needed.
pub(crate) fn new_product(name: &str, unit: Unit, price: &str, stock: &str) -> NewProduct {
    NewProduct {
        uuid: Uuid::now_v7(),
        name: name.to_string(),
        default_unit: unit,
        consumer_price: dec(price),
        business_price: dec(price),
        stock_quantity: dec(stock),
        packaging_quantity: Decimal::ONE,
        visible_to_consumers: true,
    }
}
