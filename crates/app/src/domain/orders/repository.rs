//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::orders::models::{
    Order, OrderItem, OrderStatus, ProgressEntry, ShippingAddress,
};

const COUNT_ORDERS_TODAY_SQL: &str = include_str!("sql/count_orders_today.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const APPEND_ORDER_PROGRESS_SQL: &str = include_str!("sql/append_order_progress.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const GET_ORDER_PROGRESS_SQL: &str = include_str!("sql/get_order_progress.sql");
const USER_ORDERS_SQL: &str = include_str!("sql/user_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");

/// Everything fixed about an order before it is inserted. Timestamps come
/// back from the database.
#[derive(Debug, Clone)]
pub(crate) struct OrderDraft {
    pub uuid: Uuid,
    pub order_id: String,
    pub user_uuid: Uuid,
    pub subtotal: Decimal,
    pub coupon_discount: Decimal,
    pub delivery_fee: Decimal,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping: ShippingAddress,
    pub delivery_otp: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Orders created since the start of the current UTC day. Runs inside
    /// the placement transaction so the daily sequence number and the insert
    /// see the same state; the unique index on `order_id` backstops the
    /// residual race.
    pub(crate) async fn count_orders_today(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<i64, sqlx::Error> {
        query_scalar(COUNT_ORDERS_TODAY_SQL).fetch_one(&mut **tx).await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        draft: &OrderDraft,
    ) -> Result<(Timestamp, Timestamp), sqlx::Error> {
        let (created_at, updated_at): (SqlxTimestamp, SqlxTimestamp) = query_as(CREATE_ORDER_SQL)
            .bind(draft.uuid)
            .bind(&draft.order_id)
            .bind(draft.user_uuid)
            .bind(draft.subtotal)
            .bind(draft.coupon_discount)
            .bind(draft.delivery_fee)
            .bind(draft.total_amount)
            .bind(draft.status.as_str())
            .bind(&draft.shipping.complete_address)
            .bind(&draft.shipping.landmark)
            .bind(&draft.shipping.pincode)
            .bind(&draft.shipping.city)
            .bind(&draft.shipping.state)
            .bind(&draft.delivery_otp)
            .fetch_one(&mut **tx)
            .await?;

        Ok((created_at.to_jiff(), updated_at.to_jiff()))
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
        position: i64,
        item: &OrderItem,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(order)
            .bind(item.product_uuid)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.price)
            .bind(position)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn append_progress(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
        status: OrderStatus,
        note: Option<&str>,
    ) -> Result<ProgressEntry, sqlx::Error> {
        query_as::<Postgres, ProgressEntry>(APPEND_ORDER_PROGRESS_SQL)
            .bind(order)
            .bind(status.as_str())
            .bind(note)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_progress(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
    ) -> Result<Vec<ProgressEntry>, sqlx::Error> {
        query_as::<Postgres, ProgressEntry>(GET_ORDER_PROGRESS_SQL)
            .bind(order)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(USER_ORDERS_SQL)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(order)
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

pub(crate) fn try_get_order_status(row: &PgRow, col: &str) -> Result<OrderStatus, sqlx::Error> {
    let raw: String = row.try_get(col)?;

    raw.parse::<OrderStatus>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: col.to_string(),
            source: Box::new(e),
        })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = try_get_order_status(row, "status")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            order_id: row.try_get("order_id")?,
            user_uuid: row.try_get("user_uuid")?,
            items: Vec::new(),
            subtotal: row.try_get("subtotal")?,
            coupon_discount: row.try_get("coupon_discount")?,
            delivery_fee: row.try_get("delivery_fee")?,
            total_amount: row.try_get("total_amount")?,
            status,
            shipping: ShippingAddress {
                complete_address: row.try_get("shipping_complete_address")?,
                landmark: row.try_get("shipping_landmark")?,
                pincode: row.try_get("shipping_pincode")?,
                city: row.try_get("shipping_city")?,
                state: row.try_get("shipping_state")?,
            },
            progress: Vec::new(),
            delivery_otp: row.try_get("delivery_otp")?,
            delivery_agent_uuid: row.try_get("delivery_agent_uuid")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: row.try_get("product_uuid")?,
            name: row.try_get("name")?,
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProgressEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = try_get_order_status(row, "status")?;

        Ok(Self {
            status,
            note: row.try_get("note")?,
            recorded_at: row.try_get::<SqlxTimestamp, _>("recorded_at")?.to_jiff(),
        })
    }
}
