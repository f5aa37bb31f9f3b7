//! Checkout service.
//!
//! Every operation here is a read-only gate: unlike `get_cart`, nothing is
//! clamped or persisted. Order placement re-runs the stock check inside its
//! own transaction; this service exists so clients can surface problems
//! before asking for payment.

use async_trait::async_trait;
use mandi_core::pricing;
use mockall::automock;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        addresses::repository::PgAddressesRepository,
        carts::{models::CartItem, repository::PgCartsRepository},
        catalog::{
            models::{Product, StockIssue, StockIssueKind},
            repository::PgCatalogRepository,
        },
        checkout::{
            errors::CheckoutServiceError,
            models::{
                CheckoutSummary, CheckoutValidation, DeliveryFeeQuote, PaymentSummary, SummaryLine,
            },
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts: PgCartsRepository,
    catalog: PgCatalogRepository,
    addresses: PgAddressesRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            catalog: PgCatalogRepository::new(),
            addresses: PgAddressesRepository::new(),
        }
    }

    /// Load the cart's lines and coupon discount, failing on an empty or
    /// absent cart.
    async fn load_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
    ) -> Result<(Vec<CartItem>, Decimal), CheckoutServiceError> {
        let Some(cart) = self.carts.get_cart(tx, user).await? else {
            return Err(CheckoutServiceError::EmptyCart);
        };

        let items = self.carts.get_items(tx, user).await?;

        if items.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        Ok((items, cart.coupon_discount))
    }

    async fn load_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[CartItem],
    ) -> Result<FxHashMap<Uuid, Product>, sqlx::Error> {
        let uuids: Vec<Uuid> = items.iter().map(|item| item.product_uuid).collect();

        Ok(self
            .catalog
            .get_products(tx, &uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect())
    }
}

/// Compare every line against current stock. The cart's own last-clamped
/// snapshot is not trusted; stock may have moved since.
fn collect_issues(items: &[CartItem], products: &FxHashMap<Uuid, Product>) -> Vec<StockIssue> {
    let mut issues = Vec::new();

    for item in items {
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
    }

    issues
}

fn subtotal_of(items: &[CartItem]) -> Decimal {
    items.iter().map(|item| item.line_price).sum()
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn summary(&self, user: Uuid) -> Result<CheckoutSummary, CheckoutServiceError> {
        let mut tx = self.db.begin().await?;

        let (items, coupon_discount) = self.load_lines(&mut tx, user).await?;
        let products = self.load_products(&mut tx, &items).await?;
        let address = self.addresses.default_for_user(&mut tx, user).await?;

        tx.commit().await?;

        let lines = items
            .iter()
            .filter_map(|item| {
                let product = products.get(&item.product_uuid)?;

                Some(SummaryLine {
                    product_uuid: item.product_uuid,
                    name: product.name.clone(),
                    quantity: item.quantity,
                    unit: item.unit,
                    line_price: item.line_price,
                })
            })
            .collect();

        let payment = PaymentSummary::from_subtotal(subtotal_of(&items), coupon_discount);

        Ok(CheckoutSummary {
            address,
            items: lines,
            payment,
        })
    }

    async fn validate(
        &self,
        user: Uuid,
        address: Uuid,
    ) -> Result<CheckoutValidation, CheckoutServiceError> {
        let mut tx = self.db.begin().await?;

        match self.addresses.get_for_user(&mut tx, address, user).await {
            Ok(_) => {}
            Err(sqlx::Error::RowNotFound) => return Err(CheckoutServiceError::AddressNotFound),
            Err(error) => return Err(error.into()),
        }

        let (items, coupon_discount) = self.load_lines(&mut tx, user).await?;
        let products = self.load_products(&mut tx, &items).await?;

        tx.commit().await?;

        let issues = collect_issues(&items, &products);
        let payment = PaymentSummary::from_subtotal(subtotal_of(&items), coupon_discount);

        Ok(CheckoutValidation {
            is_valid: issues.is_empty(),
            issues,
            payment,
        })
    }

    async fn delivery_fee_quote(&self, user: Uuid) -> Result<DeliveryFeeQuote, CheckoutServiceError> {
        let mut tx = self.db.begin().await?;

        let (items, _) = self.load_lines(&mut tx, user).await?;

        tx.commit().await?;

        let subtotal = subtotal_of(&items);
        let delivery_fee = pricing::delivery_fee(subtotal);

        Ok(DeliveryFeeQuote {
            subtotal,
            delivery_fee,
            free_delivery_threshold: pricing::free_delivery_threshold(),
            is_free: delivery_fee.is_zero(),
        })
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// The checkout page data: default address (nullable), line items with
    /// live names, and the payment summary.
    async fn summary(&self, user: Uuid) -> Result<CheckoutSummary, CheckoutServiceError>;

    /// Re-check every line against current stock without mutating anything.
    async fn validate(
        &self,
        user: Uuid,
        address: Uuid,
    ) -> Result<CheckoutValidation, CheckoutServiceError>;

    /// Quote the delivery fee for the cart as it stands.
    async fn delivery_fee_quote(&self, user: Uuid)
    -> Result<DeliveryFeeQuote, CheckoutServiceError>;
}
