//! Addresses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::addresses::models::{Address, NewAddress};

const GET_ADDRESS_FOR_USER_SQL: &str = include_str!("sql/get_address_for_user.sql");
const DEFAULT_ADDRESS_FOR_USER_SQL: &str = include_str!("sql/default_address_for_user.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("sql/create_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fetch an address only when it belongs to the given user; an address
    /// owned by someone else is indistinguishable from a missing one.
    pub(crate) async fn get_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: Uuid,
        user: Uuid,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(GET_ADDRESS_FOR_USER_SQL)
            .bind(address)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn default_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
    ) -> Result<Option<Address>, sqlx::Error> {
        query_as::<Postgres, Address>(DEFAULT_ADDRESS_FOR_USER_SQL)
            .bind(user)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: &NewAddress,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(CREATE_ADDRESS_SQL)
            .bind(address.uuid)
            .bind(address.user_uuid)
            .bind(&address.complete_address)
            .bind(&address.landmark)
            .bind(&address.pincode)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.nickname)
            .bind(address.is_default)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Address {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            complete_address: row.try_get("complete_address")?,
            landmark: row.try_get("landmark")?,
            pincode: row.try_get("pincode")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            nickname: row.try_get("nickname")?,
            is_default: row.try_get("is_default")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
