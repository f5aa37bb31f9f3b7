//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::payments::models::{NewPayment, Payment, PaymentMethod, PaymentStatus};

const CREATE_PAYMENT_SQL: &str = include_str!("sql/create_payment.sql");
const PAYMENTS_FOR_ORDER_SQL: &str = include_str!("sql/payments_for_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: &NewPayment,
    ) -> Result<Payment, sqlx::Error> {
        query_as::<Postgres, Payment>(CREATE_PAYMENT_SQL)
            .bind(payment.uuid)
            .bind(payment.order_uuid)
            .bind(payment.user_uuid)
            .bind(payment.amount)
            .bind(payment.method.as_str())
            .bind(payment.status.as_str())
            .bind(&payment.gateway_order_id)
            .bind(&payment.gateway_payment_id)
            .bind(payment.due_date.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn payments_for_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        query_as::<Postgres, Payment>(PAYMENTS_FOR_ORDER_SQL)
            .bind(order)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Payment {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let method: String = row.try_get("method")?;
        let method = method
            .parse::<PaymentMethod>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "method".to_string(),
                source: Box::new(e),
            })?;

        let status: String = row.try_get("status")?;
        let status = status
            .parse::<PaymentStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            order_uuid: row.try_get("order_uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            amount: row.try_get("amount")?,
            method,
            status,
            gateway_order_id: row.try_get("gateway_order_id")?,
            gateway_payment_id: row.try_get("gateway_payment_id")?,
            due_date: row
                .try_get::<Option<SqlxTimestamp>, _>("due_date")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
