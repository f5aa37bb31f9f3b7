//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use mandi_core::CartTotals;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    carts::models::{Cart, CartItem},
    catalog::repository::try_get_unit,
};

const ENSURE_CART_SQL: &str = include_str!("sql/ensure_cart.sql");
const LOCK_CART_SQL: &str = include_str!("sql/lock_cart.sql");
const GET_CART_SQL: &str = include_str!("sql/get_cart.sql");
const GET_CART_ITEMS_SQL: &str = include_str!("sql/get_cart_items.sql");
const UPSERT_CART_ITEM_SQL: &str = include_str!("sql/upsert_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("sql/delete_cart_item.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("sql/delete_cart_items.sql");
const UPDATE_CART_TOTALS_SQL: &str = include_str!("sql/update_cart_totals.sql");
const DELETE_CART_SQL: &str = include_str!("sql/delete_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Create the user's cart if it does not exist yet. Carts come into being
    /// on first access, never through an explicit create call.
    pub(crate) async fn ensure_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
    ) -> Result<(), sqlx::Error> {
        query(ENSURE_CART_SQL).bind(user).execute(&mut **tx).await?;

        Ok(())
    }

    /// Load the cart row and hold a row lock until the transaction ends, so
    /// concurrent read-modify-write cycles for the same user serialise
    /// instead of losing updates.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, Cart>(LOCK_CART_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    /// Read the cart row without locking; for read-only consumers.
    pub(crate) async fn get_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(GET_CART_SQL)
            .bind(user)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(GET_CART_ITEMS_SQL)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
        item: &CartItem,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_CART_ITEM_SQL)
            .bind(user)
            .bind(item.product_uuid)
            .bind(item.quantity)
            .bind(item.unit.as_str())
            .bind(item.line_price)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
        product: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(user)
            .bind(product)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
        products: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_CART_ITEMS_SQL)
            .bind(user)
            .bind(products)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn update_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
        totals: &CartTotals,
    ) -> Result<(), sqlx::Error> {
        query(UPDATE_CART_TOTALS_SQL)
            .bind(user)
            .bind(totals.subtotal)
            .bind(totals.total_items)
            .bind(totals.total_amount)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(user)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: row.try_get("user_uuid")?,
            items: Vec::new(),
            coupon_discount: row.try_get("coupon_discount")?,
            subtotal: row.try_get("subtotal")?,
            total_items: row.try_get("total_items")?,
            total_amount: row.try_get("total_amount")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let unit = try_get_unit(row, "unit")?;

        Ok(Self {
            product_uuid: row.try_get("product_uuid")?,
            quantity: row.try_get("quantity")?,
            unit,
            line_price: row.try_get("line_price")?,
        })
    }
}
