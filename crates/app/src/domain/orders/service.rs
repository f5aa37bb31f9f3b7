//! Orders service.
//!
//! Order placement is one transaction: load cart and address, re-validate
//! stock, snapshot lines, generate identifiers, insert the order and its
//! payment record, decrement stock behind a sufficiency guard, delete the
//! cart, commit. Any failure between begin and commit rolls the whole
//! sequence back; there is no partial order, no partial decrement and no
//! cart loss.

use std::time::Duration;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp, tz::TimeZone};
use mandi_core::pricing;
use mockall::automock;
use rand::Rng as _;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        addresses::repository::PgAddressesRepository,
        carts::repository::PgCartsRepository,
        catalog::{
            models::{Product, StockIssue, StockIssueKind},
            repository::PgCatalogRepository,
        },
        orders::{
            errors::OrdersServiceError,
            gateway::PaymentGateway,
            models::{GatewayCallback, Order, OrderItem, OrderStatus, PlaceOrder},
            repository::{OrderDraft, PgOrdersRepository},
        },
        payments::{
            models::{NewPayment, PaymentMethod, PaymentStatus},
            repository::PgPaymentsRepository,
        },
    },
};

/// Upper bound on the placement transaction. Holding stock row locks longer
/// than this under contention is a liveness hazard; fail closed and let the
/// caller retry.
const PLACEMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Grace period before a credit purchase falls due.
const CREDIT_TERM: SignedDuration = SignedDuration::from_hours(30 * 24);

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    gateway: PaymentGateway,
    orders: PgOrdersRepository,
    carts: PgCartsRepository,
    catalog: PgCatalogRepository,
    addresses: PgAddressesRepository,
    payments: PgPaymentsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, gateway: PaymentGateway) -> Self {
        Self {
            db,
            gateway,
            orders: PgOrdersRepository::new(),
            carts: PgCartsRepository::new(),
            catalog: PgCatalogRepository::new(),
            addresses: PgAddressesRepository::new(),
            payments: PgPaymentsRepository::new(),
        }
    }

    async fn hydrate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut order: Order,
    ) -> Result<Order, sqlx::Error> {
        order.items = self.orders.get_order_items(tx, order.uuid).await?;
        order.progress = self.orders.get_order_progress(tx, order.uuid).await?;

        Ok(order)
    }

    /// The single forward path shared by the offline and gateway flows.
    async fn place(
        &self,
        request: PlaceOrder,
        callback: Option<GatewayCallback>,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        // Lock the cart row so placement serialises with cart mutations.
        let cart = match self.carts.lock_cart(&mut tx, request.user_uuid).await {
            Ok(cart) => cart,
            Err(sqlx::Error::RowNotFound) => return Err(OrdersServiceError::EmptyCart),
            Err(error) => return Err(error.into()),
        };

        let items = self.carts.get_items(&mut tx, request.user_uuid).await?;

        if items.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let address = match self
            .addresses
            .get_for_user(&mut tx, request.address_uuid, request.user_uuid)
            .await
        {
            Ok(address) => address,
            Err(sqlx::Error::RowNotFound) => return Err(OrdersServiceError::AddressNotFound),
            Err(error) => return Err(error.into()),
        };

        let product_uuids: Vec<Uuid> = items.iter().map(|item| item.product_uuid).collect();

        let products: FxHashMap<Uuid, Product> = self
            .catalog
            .get_products(&mut tx, &product_uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        // Re-validate every line against current stock before writing
        // anything. Conflicts abort the whole order; there is no partial
        // fulfilment at placement time.
        let mut issues = Vec::new();
        let mut order_items = Vec::new();

        for item in &items {
            let Some(product) = products.get(&item.product_uuid) else {
                issues.push(StockIssue {
                    product_uuid: item.product_uuid,
                    name: None,
                    kind: StockIssueKind::Missing,
                });
                continue;
            };

            if !product.in_stock() {
                issues.push(StockIssue {
                    product_uuid: product.uuid,
                    name: Some(product.name.clone()),
                    kind: StockIssueKind::OutOfStock,
                });
            } else if product.stock_quantity < item.quantity {
                issues.push(StockIssue {
                    product_uuid: product.uuid,
                    name: Some(product.name.clone()),
                    kind: StockIssueKind::Insufficient {
                        available: product.stock_quantity,
                        requested: item.quantity,
                    },
                });
            }

            // Snapshot: the stored line price, not a recomputation. The
            // customer pays what the cart displayed.
            order_items.push(OrderItem {
                product_uuid: item.product_uuid,
                name: product.name.clone(),
                quantity: item.quantity,
                price: item.line_price,
            });
        }

        if !issues.is_empty() {
            warn!(user = %request.user_uuid, issues = issues.len(), "order aborted on stock conflict");

            return Err(OrdersServiceError::StockConflict(issues));
        }

        let subtotal: Decimal = items.iter().map(|item| item.line_price).sum();
        let delivery_fee = pricing::delivery_fee(subtotal);
        let total_amount = pricing::order_total(subtotal, cart.coupon_discount, delivery_fee);

        if total_amount != request.expected_total {
            return Err(OrdersServiceError::TotalMismatch {
                expected: request.expected_total,
                actual: total_amount,
            });
        }

        // Daily-scoped human-readable id; counted inside this transaction.
        let sequence = self.orders.count_orders_today(&mut tx).await? + 1;
        let date = Timestamp::now().to_zoned(TimeZone::UTC).date();
        let order_id = format!(
            "ORD-{:04}{:02}{:02}-{sequence:04}",
            date.year(),
            date.month(),
            date.day()
        );

        let delivery_otp = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));

        let status = if callback.is_some() {
            OrderStatus::Confirmed
        } else {
            OrderStatus::Pending
        };

        let draft = OrderDraft {
            uuid: Uuid::now_v7(),
            order_id,
            user_uuid: request.user_uuid,
            subtotal,
            coupon_discount: cart.coupon_discount,
            delivery_fee,
            total_amount,
            status,
            shipping: address.into(),
            delivery_otp,
        };

        let (created_at, updated_at) = self.orders.create_order(&mut tx, &draft).await?;

        for (position, item) in order_items.iter().enumerate() {
            self.orders
                .create_order_item(&mut tx, draft.uuid, position as i64, item)
                .await?;
        }

        let mut progress = vec![
            self.orders
                .append_progress(
                    &mut tx,
                    draft.uuid,
                    OrderStatus::Pending,
                    Some("Order placed by customer"),
                )
                .await?,
        ];

        if callback.is_some() {
            progress.push(
                self.orders
                    .append_progress(
                        &mut tx,
                        draft.uuid,
                        OrderStatus::Confirmed,
                        Some("Payment received"),
                    )
                    .await?,
            );
        }

        // Payment record: gateway settlements are already paid; offline
        // methods settle later and online pre-authorised ones are recorded by
        // the gateway flow only.
        let payment = match &callback {
            Some(callback) => Some(NewPayment {
                uuid: Uuid::now_v7(),
                order_uuid: draft.uuid,
                user_uuid: request.user_uuid,
                amount: total_amount,
                method: request.method,
                status: PaymentStatus::Paid,
                gateway_order_id: Some(callback.gateway_order_id.clone()),
                gateway_payment_id: Some(callback.gateway_payment_id.clone()),
                due_date: None,
            }),
            None if request.method.is_offline() => Some(NewPayment {
                uuid: Uuid::now_v7(),
                order_uuid: draft.uuid,
                user_uuid: request.user_uuid,
                amount: total_amount,
                method: request.method,
                status: PaymentStatus::Pending,
                gateway_order_id: None,
                gateway_payment_id: None,
                due_date: if matches!(request.method, PaymentMethod::Credit) {
                    created_at.checked_add(CREDIT_TERM).ok()
                } else {
                    None
                },
            }),
            None => None,
        };

        if let Some(payment) = payment {
            self.payments.create_payment(&mut tx, &payment).await?;
        }

        // Guarded decrements, in product order so concurrent placements
        // touching the same products cannot deadlock. A guard failure means
        // stock moved under us after the pre-check: abort everything.
        let mut decrements: Vec<_> = items
            .iter()
            .map(|item| (item.product_uuid, item.quantity))
            .collect();
        decrements.sort_by_key(|(uuid, _)| *uuid);

        for (product_uuid, quantity) in decrements {
            let rows = self
                .catalog
                .decrement_stock(&mut tx, product_uuid, quantity)
                .await?;

            if rows == 0 {
                let live = self.catalog.get_product(&mut tx, product_uuid).await?;

                warn!(user = %request.user_uuid, product = %product_uuid, "stock moved during placement");

                return Err(OrdersServiceError::StockConflict(vec![StockIssue {
                    product_uuid,
                    name: Some(live.name),
                    kind: StockIssueKind::Insufficient {
                        available: live.stock_quantity,
                        requested: quantity,
                    },
                }]));
            }
        }

        // A fresh cart appears lazily on the user's next access.
        self.carts.delete_cart(&mut tx, request.user_uuid).await?;

        tx.commit().await?;

        info!(order_id = %draft.order_id, user = %request.user_uuid, %total_amount, "order placed");

        Ok(Order {
            uuid: draft.uuid,
            order_id: draft.order_id,
            user_uuid: draft.user_uuid,
            items: order_items,
            subtotal: draft.subtotal,
            coupon_discount: draft.coupon_discount,
            delivery_fee: draft.delivery_fee,
            total_amount: draft.total_amount,
            status: draft.status,
            shipping: draft.shipping,
            progress,
            delivery_otp: draft.delivery_otp,
            delivery_agent_uuid: None,
            created_at,
            updated_at,
        })
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn place_order(&self, request: PlaceOrder) -> Result<Order, OrdersServiceError> {
        tokio::time::timeout(PLACEMENT_TIMEOUT, self.place(request, None))
            .await
            .map_err(|_elapsed| OrdersServiceError::Timeout)?
    }

    async fn verify_and_place(
        &self,
        callback: GatewayCallback,
        request: PlaceOrder,
    ) -> Result<Order, OrdersServiceError> {
        if !self.gateway.verify_signature(
            &callback.gateway_order_id,
            &callback.gateway_payment_id,
            &callback.signature,
        ) {
            return Err(OrdersServiceError::SignatureMismatch);
        }

        tokio::time::timeout(PLACEMENT_TIMEOUT, self.place(request, Some(callback)))
            .await
            .map_err(|_elapsed| OrdersServiceError::Timeout)?
    }

    async fn get_order(&self, order: Uuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders.get_order(&mut tx, order).await?;
        let order = self.hydrate(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn user_orders(&self, user: Uuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = Vec::new();

        for order in self.orders.user_orders(&mut tx, user).await? {
            orders.push(self.hydrate(&mut tx, order).await?);
        }

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        order: Uuid,
        status: OrderStatus,
        note: Option<String>,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.orders.update_status(&mut tx, order, status).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        self.orders
            .append_progress(&mut tx, order, status, note.as_deref())
            .await?;

        let updated = self.orders.get_order(&mut tx, order).await?;
        let updated = self.hydrate(&mut tx, updated).await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order from the user's cart, paying offline (COD/credit) or
    /// via a pre-authorised online method settled later by the gateway.
    async fn place_order(&self, request: PlaceOrder) -> Result<Order, OrdersServiceError>;

    /// Verify a gateway callback signature, then place the order as already
    /// paid.
    async fn verify_and_place(
        &self,
        callback: GatewayCallback,
        request: PlaceOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieve a single order with its lines and progress history.
    async fn get_order(&self, order: Uuid) -> Result<Order, OrdersServiceError>;

    /// All of a user's orders, newest first.
    async fn user_orders(&self, user: Uuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Append a progress entry and set the current status.
    async fn update_status(
        &self,
        order: Uuid,
        status: OrderStatus,
        note: Option<String>,
    ) -> Result<Order, OrdersServiceError>;
}
