//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use mandi_app::{
    context::AppContext,
    domain::{
        carts::{MockCartsService, models::Cart},
        checkout::{
            MockCheckoutService,
            models::{CheckoutSummary, PaymentSummary},
        },
        orders::{
            MockOrdersService,
            models::{Order, OrderItem, OrderStatus, ProgressEntry, ShippingAddress},
        },
    },
};

use crate::state::State;

pub(crate) fn dec(s: &str) -> Decimal {
    s.parse().expect("test literal must be a valid decimal")
}

pub(crate) fn make_cart(user: Uuid) -> Cart {
    Cart {
        user_uuid: user,
        items: Vec::new(),
        coupon_discount: Decimal::ZERO,
        subtotal: Decimal::ZERO,
        total_items: 0,
        total_amount: Decimal::ZERO,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

pub(crate) fn make_summary() -> CheckoutSummary {
    CheckoutSummary {
        address: None,
        items: Vec::new(),
        payment: PaymentSummary::from_subtotal(dec("160"), Decimal::ZERO),
    }
}

pub(crate) fn make_order(user: Uuid) -> Order {
    Order {
        uuid: Uuid::now_v7(),
        order_id: "ORD-20250301-0001".to_string(),
        user_uuid: user,
        items: vec![OrderItem {
            product_uuid: Uuid::now_v7(),
            name: "Basmati Rice".to_string(),
            quantity: dec("2"),
            price: dec("160"),
        }],
        subtotal: dec("160"),
        coupon_discount: Decimal::ZERO,
        delivery_fee: dec("50"),
        total_amount: dec("210"),
        status: OrderStatus::Pending,
        shipping: ShippingAddress {
            complete_address: "12 Gandhi Road".to_string(),
            landmark: None,
            pincode: "560001".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
        },
        progress: vec![ProgressEntry {
            status: OrderStatus::Pending,
            note: Some("Order placed by customer".to_string()),
            recorded_at: Timestamp::now(),
        }],
        delivery_otp: "123456".to_string(),
        delivery_agent_uuid: None,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_quantity().never();
    carts.expect_remove_item().never();

    carts
}

fn strict_checkout_mock() -> MockCheckoutService {
    let mut checkout = MockCheckoutService::new();

    checkout.expect_summary().never();
    checkout.expect_validate().never();
    checkout.expect_delivery_fee_quote().never();

    checkout
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_place_order().never();
    orders.expect_verify_and_place().never();
    orders.expect_get_order().never();
    orders.expect_user_orders().never();
    orders.expect_update_status().never();

    orders
}

fn state_with(
    carts: MockCartsService,
    checkout: MockCheckoutService,
    orders: MockOrdersService,
) -> Arc<State> {
    Arc::new(State::new(AppContext {
        carts: Arc::new(carts),
        checkout: Arc::new(checkout),
        orders: Arc::new(orders),
    }))
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(
                carts,
                strict_checkout_mock(),
                strict_orders_mock(),
            )))
            .push(route),
    )
}

pub(crate) fn checkout_service(checkout: MockCheckoutService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(
                strict_carts_mock(),
                checkout,
                strict_orders_mock(),
            )))
            .push(route),
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(
                strict_carts_mock(),
                strict_checkout_mock(),
                orders,
            )))
            .push(route),
    )
}
