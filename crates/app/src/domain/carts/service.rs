//! Carts service.

use async_trait::async_trait;
use mandi_core::{
    CartTotals, CustomerTier,
    pricing::line_price,
    units::{QUANTITY_SCALE, truncate},
};
use mockall::automock;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartItem, CartMutation, CartView, LineChange},
            repository::PgCartsRepository,
        },
        catalog::{models::Product, repository::PgCatalogRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts: PgCartsRepository,
    catalog: PgCatalogRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            catalog: PgCatalogRepository::new(),
        }
    }

    /// Recompute aggregates from the lines currently stored, persist them,
    /// and return the assembled cart.
    async fn refresh(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut cart: Cart,
    ) -> Result<Cart, sqlx::Error> {
        let items = self.carts.get_items(tx, cart.user_uuid).await?;

        let totals = CartTotals::compute(
            items.iter().map(|item| item.line_price),
            cart.coupon_discount,
        );

        self.carts.update_totals(tx, cart.user_uuid, &totals).await?;

        cart.items = items;
        cart.subtotal = totals.subtotal;
        cart.total_items = totals.total_items;
        cart.total_amount = totals.total_amount;

        Ok(cart)
    }

    /// Fetch the product or fail; a product hidden from the caller's tier is
    /// indistinguishable from an absent one.
    async fn visible_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
        tier: CustomerTier,
    ) -> Result<Product, CartsServiceError> {
        let product = match self.catalog.get_product(tx, product).await {
            Ok(product) => product,
            Err(sqlx::Error::RowNotFound) => return Err(CartsServiceError::ProductNotFound),
            Err(error) => return Err(CartsServiceError::Sql(error)),
        };

        if !product.visible_to(tier) {
            return Err(CartsServiceError::ProductNotFound);
        }

        Ok(product)
    }

    /// Apply a negative `add_item` delta: shrink or remove the existing line.
    async fn shrink_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
        tier: CustomerTier,
        change: LineChange,
        line: CartItem,
        product: &Product,
    ) -> Result<(Decimal, Option<String>), CartsServiceError> {
        let delta = change.unit.to_canonical(change.quantity);
        let remaining = truncate(line.quantity + delta, QUANTITY_SCALE);

        if remaining <= Decimal::ZERO {
            self.carts.delete_item(tx, user, change.product_uuid).await?;

            return Ok((
                Decimal::ZERO,
                Some(format!("{} removed from your cart.", product.name)),
            ));
        }

        // Shrinking must not leave the line under the packaging minimum.
        if remaining < product.minimum_canonical_quantity() {
            return Err(CartsServiceError::BelowMinimum {
                minimum: change.unit.from_canonical(product.minimum_canonical_quantity()),
                entered: change.unit.from_canonical(remaining),
                unit: change.unit,
            });
        }

        let updated = CartItem {
            quantity: remaining,
            line_price: line_price(product.unit_price(tier), remaining),
            ..line
        };

        self.carts.upsert_item(tx, user, &updated).await?;

        Ok((change.unit.from_canonical(remaining), None))
    }

    /// Write a line at the requested quantity, clamped to sellable stock.
    /// Partial fulfilment is preferred over rejection: meeting or exceeding
    /// stock is a success with an explanatory message, never an error.
    async fn write_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
        tier: CustomerTier,
        change: LineChange,
        requested: Decimal,
        product: &Product,
    ) -> Result<(Decimal, Option<String>), CartsServiceError> {
        let stock = product.sellable_stock();
        let clamped = requested.min(stock);

        let message = (requested > stock).then(|| {
            format!(
                "Only {}{} of {} available. Quantity adjusted to {}{}.",
                change.unit.from_canonical(stock),
                change.unit,
                product.name,
                change.unit.from_canonical(stock),
                change.unit,
            )
        });

        let item = CartItem {
            product_uuid: change.product_uuid,
            quantity: clamped,
            unit: change.unit,
            line_price: line_price(product.unit_price(tier), clamped),
        };

        self.carts.upsert_item(tx, user, &item).await?;

        Ok((change.unit.from_canonical(clamped), message))
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(
        &self,
        user: Uuid,
        tier: CustomerTier,
    ) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts.ensure_cart(&mut tx, user).await?;
        let cart = self.carts.lock_cart(&mut tx, user).await?;
        let items = self.carts.get_items(&mut tx, user).await?;

        let product_uuids: Vec<Uuid> = items.iter().map(|item| item.product_uuid).collect();

        let products: FxHashMap<Uuid, Product> = self
            .catalog
            .get_products(&mut tx, &product_uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let mut adjustments = Vec::new();
        let mut dropped = Vec::new();

        for mut item in items {
            let Some(product) = products.get(&item.product_uuid) else {
                adjustments
                    .push("A product was removed from your cart because it no longer exists.".to_string());
                dropped.push(item.product_uuid);
                continue;
            };

            if !product.visible_to(tier) {
                adjustments.push(format!(
                    "{} is not available and was removed from your cart.",
                    product.name
                ));
                dropped.push(item.product_uuid);
                continue;
            }

            if !product.in_stock() {
                adjustments.push(format!(
                    "{} is out of stock and was removed from your cart.",
                    product.name
                ));
                dropped.push(item.product_uuid);
                continue;
            }

            if product.stock_quantity < item.quantity {
                let clamped = product.sellable_stock();

                item.quantity = clamped;
                item.line_price = line_price(product.unit_price(tier), clamped);

                self.carts.upsert_item(&mut tx, user, &item).await?;

                adjustments.push(format!(
                    "{} adjusted to {}{} due to stock limits.",
                    product.name,
                    item.unit.from_canonical(clamped),
                    item.unit,
                ));
            }
        }

        if !dropped.is_empty() {
            self.carts.delete_items(&mut tx, user, &dropped).await?;
        }

        let cart = self.refresh(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(CartView { cart, adjustments })
    }

    async fn add_item(
        &self,
        user: Uuid,
        tier: CustomerTier,
        change: LineChange,
    ) -> Result<CartMutation, CartsServiceError> {
        if change.quantity.is_zero() {
            return Err(CartsServiceError::ZeroQuantity);
        }

        let mut tx = self.db.begin().await?;

        self.carts.ensure_cart(&mut tx, user).await?;
        let cart = self.carts.lock_cart(&mut tx, user).await?;

        let product = self.visible_product(&mut tx, change.product_uuid, tier).await?;

        let items = self.carts.get_items(&mut tx, user).await?;
        let existing = items
            .into_iter()
            .find(|item| item.product_uuid == change.product_uuid);

        let (effective_quantity, message) = if change.quantity < Decimal::ZERO {
            let Some(line) = existing else {
                return Err(CartsServiceError::ItemNotFound);
            };

            self.shrink_line(&mut tx, user, tier, change, line, &product)
                .await?
        } else {
            if !product.in_stock() {
                return Err(CartsServiceError::OutOfStock);
            }

            let delta = change.unit.to_canonical(change.quantity);

            // New lines must start at the packaging minimum; growing an
            // existing line cannot fall below it.
            if existing.is_none() && delta < product.minimum_canonical_quantity() {
                return Err(CartsServiceError::BelowMinimum {
                    minimum: change
                        .unit
                        .from_canonical(product.minimum_canonical_quantity()),
                    entered: change.quantity.normalize(),
                    unit: change.unit,
                });
            }

            let current = existing.map(|line| line.quantity).unwrap_or_default();
            let requested = truncate(current + delta, QUANTITY_SCALE);

            self.write_line(&mut tx, user, tier, change, requested, &product)
                .await?
        };

        let cart = self.refresh(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(CartMutation {
            cart,
            effective_quantity,
            message,
        })
    }

    async fn update_quantity(
        &self,
        user: Uuid,
        tier: CustomerTier,
        change: LineChange,
    ) -> Result<CartMutation, CartsServiceError> {
        if change.quantity < Decimal::ZERO {
            return Err(CartsServiceError::NegativeQuantity);
        }

        let mut tx = self.db.begin().await?;

        self.carts.ensure_cart(&mut tx, user).await?;
        let cart = self.carts.lock_cart(&mut tx, user).await?;

        let product = self.visible_product(&mut tx, change.product_uuid, tier).await?;

        let items = self.carts.get_items(&mut tx, user).await?;
        let existing = items
            .into_iter()
            .find(|item| item.product_uuid == change.product_uuid);

        if existing.is_none() {
            return Err(CartsServiceError::ItemNotFound);
        }

        let (effective_quantity, message) = if change.quantity.is_zero() {
            self.carts.delete_item(&mut tx, user, change.product_uuid).await?;

            (
                Decimal::ZERO,
                Some(format!("{} removed from your cart.", product.name)),
            )
        } else {
            if !product.in_stock() {
                return Err(CartsServiceError::OutOfStock);
            }

            let requested = change.unit.to_canonical(change.quantity);

            if requested < product.minimum_canonical_quantity() {
                return Err(CartsServiceError::BelowMinimum {
                    minimum: change
                        .unit
                        .from_canonical(product.minimum_canonical_quantity()),
                    entered: change.quantity.normalize(),
                    unit: change.unit,
                });
            }

            self.write_line(&mut tx, user, tier, change, requested, &product)
                .await?
        };

        let cart = self.refresh(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(CartMutation {
            cart,
            effective_quantity,
            message,
        })
    }

    async fn remove_item(&self, user: Uuid, product: Uuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts.ensure_cart(&mut tx, user).await?;
        let cart = self.carts.lock_cart(&mut tx, user).await?;

        // Removing an absent line is not an error; the cart is simply
        // recomputed and returned as-is.
        self.carts.delete_item(&mut tx, user, product).await?;

        let cart = self.refresh(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart, creating it lazily, after revalidating every
    /// line against the live catalog. Adjustments (drops and clamps) are
    /// persisted and reported back as human-readable messages.
    async fn get_cart(&self, user: Uuid, tier: CustomerTier)
    -> Result<CartView, CartsServiceError>;

    /// Add a quantity of a product to the cart. Positive quantities are a
    /// delta on any existing line; negative quantities remove that magnitude
    /// from an existing line.
    async fn add_item(
        &self,
        user: Uuid,
        tier: CustomerTier,
        change: LineChange,
    ) -> Result<CartMutation, CartsServiceError>;

    /// Set a line to an absolute quantity. Zero removes the line; negative
    /// values are rejected.
    async fn update_quantity(
        &self,
        user: Uuid,
        tier: CustomerTier,
        change: LineChange,
    ) -> Result<CartMutation, CartsServiceError>;

    /// Remove a line. Idempotent.
    async fn remove_item(&self, user: Uuid, product: Uuid) -> Result<Cart, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use mandi_core::Unit;
    use testresult::TestResult;

    use crate::test::{TestContext, dec, new_product};

    use super::*;

    fn change(product: Uuid, quantity: &str, unit: Unit) -> LineChange {
        LineChange {
            product_uuid: product,
            quantity: dec(quantity),
            unit,
        }
    }

    #[tokio::test]
    async fn get_cart_is_created_lazily_and_empty() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let view = ctx.carts.get_cart(user, CustomerTier::Consumer).await?;

        assert_eq!(view.cart.user_uuid, user);
        assert!(view.cart.items.is_empty());
        assert_eq!(view.cart.subtotal, Decimal::ZERO);
        assert!(view.adjustments.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn add_item_stores_canonical_quantity_and_snapshot_price() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let mut new = new_product("Jaggery", Unit::Grams, "81.33", "10");
        new.packaging_quantity = dec("500");
        let product = ctx.catalog.create_product(new).await?;

        let mutation = ctx
            .carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "500", Unit::Grams),
            )
            .await?;

        assert_eq!(mutation.effective_quantity, dec("500"));
        assert!(mutation.message.is_none());

        let item = &mutation.cart.items[0];
        assert_eq!(item.quantity, dec("0.5"));
        assert_eq!(item.unit, Unit::Grams);
        // 0.5 kg at 81.33/kg rounds up to 40.67.
        assert_eq!(item.line_price, dec("40.67"));
        assert_eq!(mutation.cart.subtotal, dec("40.67"));
        assert_eq!(mutation.cart.total_items, 1);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_below_packaging_minimum_is_rejected_with_message() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let mut new = new_product("Poha", Unit::Grams, "60", "10");
        new.packaging_quantity = dec("500");
        let product = ctx.catalog.create_product(new).await?;

        let result = ctx
            .carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "300", Unit::Grams),
            )
            .await;

        let Err(error) = result else {
            panic!("expected BelowMinimum, got {result:?}");
        };

        assert_eq!(
            error.to_string(),
            "Minimum order is 500gms. You entered 300gms."
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_twice_sums_quantities_and_reprices() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Onions", Unit::Kilograms, "30", "10"))
            .await?;

        ctx.carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "2", Unit::Kilograms),
            )
            .await?;

        let mutation = ctx
            .carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "3", Unit::Kilograms),
            )
            .await?;

        assert_eq!(mutation.effective_quantity, dec("5"));
        assert_eq!(mutation.cart.items.len(), 1);
        assert_eq!(mutation.cart.items[0].quantity, dec("5"));
        assert_eq!(mutation.cart.items[0].line_price, dec("150"));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_clamps_to_stock_instead_of_rejecting() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Tomatoes", Unit::Kilograms, "40", "3"))
            .await?;

        let mutation = ctx
            .carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "10", Unit::Kilograms),
            )
            .await?;

        assert_eq!(mutation.effective_quantity, dec("3"));
        assert!(
            mutation
                .message
                .as_deref()
                .is_some_and(|m| m.contains("adjusted")),
            "expected a clamp message, got {:?}",
            mutation.message
        );
        assert_eq!(mutation.cart.items[0].quantity, dec("3"));
        assert_eq!(mutation.cart.items[0].line_price, dec("120"));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_zero_stock_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Spinach", Unit::Kilograms, "25", "0"))
            .await?;

        let result = ctx
            .carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "1", Unit::Kilograms),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::OutOfStock)),
            "expected OutOfStock, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(new_product("Carrots", Unit::Kilograms, "35", "5"))
            .await?;

        let result = ctx
            .carts
            .add_item(
                Uuid::now_v7(),
                CustomerTier::Consumer,
                change(product.uuid, "0", Unit::Kilograms),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ZeroQuantity)),
            "expected ZeroQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn negative_add_shrinks_an_existing_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Potatoes", Unit::Kilograms, "20", "10"))
            .await?;

        ctx.carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "5", Unit::Kilograms),
            )
            .await?;

        let mutation = ctx
            .carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "-2", Unit::Kilograms),
            )
            .await?;

        assert_eq!(mutation.effective_quantity, dec("3"));
        assert_eq!(mutation.cart.items[0].quantity, dec("3"));
        assert_eq!(mutation.cart.items[0].line_price, dec("60"));

        Ok(())
    }

    #[tokio::test]
    async fn negative_add_without_line_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(new_product("Garlic", Unit::Kilograms, "200", "5"))
            .await?;

        let result = ctx
            .carts
            .add_item(
                Uuid::now_v7(),
                CustomerTier::Consumer,
                change(product.uuid, "-1", Unit::Kilograms),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn negative_add_to_zero_removes_the_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Ginger", Unit::Kilograms, "90", "5"))
            .await?;

        ctx.carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "2", Unit::Kilograms),
            )
            .await?;

        let mutation = ctx
            .carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "-2", Unit::Kilograms),
            )
            .await?;

        assert_eq!(mutation.effective_quantity, Decimal::ZERO);
        assert!(mutation.cart.items.is_empty());
        assert_eq!(mutation.cart.subtotal, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_is_an_absolute_set() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Rice", Unit::Kilograms, "80", "20"))
            .await?;

        ctx.carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "5", Unit::Kilograms),
            )
            .await?;

        let mutation = ctx
            .carts
            .update_quantity(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "2", Unit::Kilograms),
            )
            .await?;

        assert_eq!(mutation.effective_quantity, dec("2"));
        assert_eq!(mutation.cart.items[0].quantity, dec("2"));
        assert_eq!(mutation.cart.items[0].line_price, dec("160"));

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_zero_removes_the_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Wheat", Unit::Kilograms, "45", "20"))
            .await?;

        ctx.carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "3", Unit::Kilograms),
            )
            .await?;

        let mutation = ctx
            .carts
            .update_quantity(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "0", Unit::Kilograms),
            )
            .await?;

        assert_eq!(mutation.effective_quantity, Decimal::ZERO);
        assert!(mutation.cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_negative_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(new_product("Barley", Unit::Kilograms, "55", "20"))
            .await?;

        let result = ctx
            .carts
            .update_quantity(
                Uuid::now_v7(),
                CustomerTier::Consumer,
                change(product.uuid, "-1", Unit::Kilograms),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NegativeQuantity)),
            "expected NegativeQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_missing_line_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(new_product("Millet", Unit::Kilograms, "65", "20"))
            .await?;

        let result = ctx
            .carts
            .update_quantity(
                Uuid::now_v7(),
                CustomerTier::Consumer,
                change(product.uuid, "2", Unit::Kilograms),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Cumin", Unit::Kilograms, "400", "5"))
            .await?;

        ctx.carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "1", Unit::Kilograms),
            )
            .await?;

        let cart = ctx.carts.remove_item(user, product.uuid).await?;
        assert!(cart.items.is_empty());

        // A second removal of the same product changes nothing and is not an
        // error.
        let cart = ctx.carts.remove_item(user, product.uuid).await?;
        assert!(cart.items.is_empty());
        assert_eq!(cart.subtotal, Decimal::ZERO);
        assert_eq!(cart.total_amount, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_drops_out_of_stock_items_with_message() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Paneer", Unit::Kilograms, "320", "4"))
            .await?;

        ctx.carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "2", Unit::Kilograms),
            )
            .await?;

        // Stock vanishes behind the cart's back.
        ctx.set_stock(product.uuid, dec("0")).await;

        let view = ctx.carts.get_cart(user, CustomerTier::Consumer).await?;

        assert!(view.cart.items.is_empty());
        assert_eq!(view.cart.subtotal, Decimal::ZERO);
        assert_eq!(view.adjustments.len(), 1);
        assert!(view.adjustments[0].contains("out of stock"));

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_clamps_to_reduced_stock_and_reprices() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let product = ctx
            .catalog
            .create_product(new_product("Ghee", Unit::Litres, "600", "10"))
            .await?;

        ctx.carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(product.uuid, "5", Unit::Litres),
            )
            .await?;

        ctx.set_stock(product.uuid, dec("2")).await;

        let view = ctx.carts.get_cart(user, CustomerTier::Consumer).await?;

        assert_eq!(view.cart.items[0].quantity, dec("2"));
        assert_eq!(view.cart.items[0].line_price, dec("1200"));
        assert_eq!(view.cart.subtotal, dec("1200"));
        assert_eq!(view.adjustments.len(), 1);
        assert!(view.adjustments[0].contains("adjusted to 2ltr"));

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_hides_consumer_invisible_products_by_tier() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let mut new = new_product("Bulk Flour", Unit::Kilograms, "32", "100");
        new.visible_to_consumers = false;
        let product = ctx.catalog.create_product(new).await?;

        // A business customer can carry the item.
        ctx.carts
            .add_item(
                user,
                CustomerTier::Business,
                change(product.uuid, "10", Unit::Kilograms),
            )
            .await?;

        // Read back as a consumer: the line is dropped.
        let view = ctx.carts.get_cart(user, CustomerTier::Consumer).await?;

        assert!(view.cart.items.is_empty());
        assert_eq!(view.adjustments.len(), 1);
        assert!(view.adjustments[0].contains("not available"));

        Ok(())
    }

    #[tokio::test]
    async fn business_tier_pays_the_business_price() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let mut new = new_product("Sugar", Unit::Kilograms, "50", "100");
        new.business_price = dec("42");
        let product = ctx.catalog.create_product(new).await?;

        let mutation = ctx
            .carts
            .add_item(
                user,
                CustomerTier::Business,
                change(product.uuid, "10", Unit::Kilograms),
            )
            .await?;

        assert_eq!(mutation.cart.items[0].line_price, dec("420"));

        Ok(())
    }

    #[tokio::test]
    async fn aggregates_stay_consistent_across_mutations() -> TestResult {
        let ctx = TestContext::new().await;
        let user = Uuid::now_v7();

        let first = ctx
            .catalog
            .create_product(new_product("Dal", Unit::Kilograms, "120", "50"))
            .await?;
        let second = ctx
            .catalog
            .create_product(new_product("Salt", Unit::Kilograms, "18", "50"))
            .await?;

        ctx.carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(first.uuid, "2", Unit::Kilograms),
            )
            .await?;

        let mutation = ctx
            .carts
            .add_item(
                user,
                CustomerTier::Consumer,
                change(second.uuid, "1", Unit::Kilograms),
            )
            .await?;

        let cart = &mutation.cart;
        let summed: Decimal = cart.items.iter().map(|item| item.line_price).sum();

        assert_eq!(cart.subtotal, summed);
        assert_eq!(cart.total_items, 2);
        assert_eq!(cart.total_amount, cart.subtotal - cart.coupon_discount);

        Ok(())
    }
}
