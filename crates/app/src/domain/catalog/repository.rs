//! Products Repository

use mandi_core::Unit;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::catalog::models::{NewProduct, Product};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_PRODUCTS_SQL: &str = include_str!("sql/get_products.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[Uuid],
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCTS_SQL)
            .bind(products)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid)
            .bind(&product.name)
            .bind(product.default_unit.as_str())
            .bind(product.consumer_price)
            .bind(product.business_price)
            .bind(product.stock_quantity)
            .bind(product.packaging_quantity)
            .bind(product.visible_to_consumers)
            .fetch_one(&mut **tx)
            .await
    }

    /// Decrement stock only when enough remains. Returns the number of rows
    /// updated; zero means the guard failed and the caller must treat the
    /// decrement as a stock conflict.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
        quantity: Decimal,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product)
            .bind(quantity)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let default_unit = try_get_unit(row, "default_unit")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            default_unit,
            consumer_price: row.try_get("consumer_price")?,
            business_price: row.try_get("business_price")?,
            stock_quantity: row.try_get("stock_quantity")?,
            packaging_quantity: row.try_get("packaging_quantity")?,
            visible_to_consumers: row.try_get("visible_to_consumers")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

pub(crate) fn try_get_unit(row: &PgRow, col: &str) -> Result<Unit, sqlx::Error> {
    let raw: String = row.try_get(col)?;

    raw.parse::<Unit>().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
