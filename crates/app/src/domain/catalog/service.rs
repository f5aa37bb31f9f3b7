//! Catalog service.
//!
//! Thin wrapper over the repository for product creation and lookup. The
//! ordering pipeline never goes through this service: cart and order
//! operations read products inside their own transactions so that the stock
//! they validate against is the stock they decrement.

use uuid::Uuid;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{NewProduct, Product},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }

    /// Retrieve a single product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::NotFound`] when no such product exists.
    pub async fn get_product(&self, product: Uuid) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    /// Creates a new product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::AlreadyExists`] on a duplicate UUID.
    pub async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use uuid::Uuid;

    use mandi_core::Unit;

    use crate::{
        domain::catalog::repository::PgCatalogRepository,
        test::{TestContext, new_product},
    };

    use super::*;

    #[tokio::test]
    async fn create_product_round_trips() -> TestResult {
        let ctx = TestContext::new().await;

        let new = new_product("Basmati Rice", Unit::Kilograms, "80", "10");
        let created = ctx.catalog.create_product(new.clone()).await?;

        assert_eq!(created.uuid, new.uuid);
        assert_eq!(created.name, "Basmati Rice");
        assert_eq!(created.stock_quantity, Decimal::from(10));

        let fetched = ctx.catalog.get_product(new.uuid).await?;

        assert_eq!(fetched.uuid, new.uuid);
        assert_eq!(fetched.consumer_price, created.consumer_price);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_product(Uuid::now_v7()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        let new = new_product("Toor Dal", Unit::Kilograms, "120", "5");

        ctx.catalog.create_product(new.clone()).await?;

        let result = ctx.catalog.create_product(new).await;

        assert!(
            matches!(result, Err(CatalogServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn decrement_refuses_to_take_stock_below_zero() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(new_product("Moong Dal", Unit::Kilograms, "150", "3"))
            .await?;

        let mut tx = ctx.db.begin_test_transaction().await;
        let repository = PgCatalogRepository::new();

        let taken = repository
            .decrement_stock(&mut tx, product.uuid, Decimal::from(2))
            .await?;
        assert_eq!(taken, 1);

        let refused = repository
            .decrement_stock(&mut tx, product.uuid, Decimal::from(2))
            .await?;
        assert_eq!(refused, 0, "guarded decrement must fail, not go negative");

        Ok(())
    }
}
