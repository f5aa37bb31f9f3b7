//! Product Models

use std::fmt;

use jiff::Timestamp;
use mandi_core::{
    CustomerTier, Unit,
    units::{QUANTITY_SCALE, truncate},
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Product Model
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: Uuid,
    pub name: String,
    /// Unit the product is merchandised in; the packaging minimum is
    /// expressed in this unit.
    pub default_unit: Unit,
    pub consumer_price: Decimal,
    pub business_price: Decimal,
    /// Stock on hand, in the canonical unit. Never negative; decremented
    /// only by committed orders.
    pub stock_quantity: Decimal,
    /// Smallest orderable increment, in `default_unit`.
    pub packaging_quantity: Decimal,
    pub visible_to_consumers: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// The price field that applies to the given tier.
    #[must_use]
    pub const fn unit_price(&self, tier: CustomerTier) -> Decimal {
        tier.select(self.consumer_price, self.business_price)
    }

    /// Business customers see the whole catalog; consumers only what is
    /// flagged visible.
    #[must_use]
    pub const fn visible_to(&self, tier: CustomerTier) -> bool {
        matches!(tier, CustomerTier::Business) || self.visible_to_consumers
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > Decimal::ZERO
    }

    /// The packaging minimum converted to the canonical unit.
    #[must_use]
    pub fn minimum_canonical_quantity(&self) -> Decimal {
        self.default_unit.to_canonical(self.packaging_quantity)
    }

    /// Stock truncated to the canonical quantity scale, the most a single
    /// line may be clamped to.
    #[must_use]
    pub fn sellable_stock(&self) -> Decimal {
        truncate(self.stock_quantity, QUANTITY_SCALE)
    }
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: Uuid,
    pub name: String,
    pub default_unit: Unit,
    pub consumer_price: Decimal,
    pub business_price: Decimal,
    pub stock_quantity: Decimal,
    pub packaging_quantity: Decimal,
    pub visible_to_consumers: bool,
}

/// A detected mismatch between a cart line and a product's live stock.
#[derive(Debug, Clone, PartialEq)]
pub struct StockIssue {
    pub product_uuid: Uuid,
    /// Missing products have no name to report.
    pub name: Option<String>,
    pub kind: StockIssueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StockIssueKind {
    /// The product record no longer exists.
    Missing,
    /// Stock is zero.
    OutOfStock,
    /// Stock is positive but below the cart quantity.
    Insufficient {
        available: Decimal,
        requested: Decimal,
    },
}

impl fmt::Display for StockIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("A product");

        match &self.kind {
            StockIssueKind::Missing => write!(f, "{name} no longer exists"),
            StockIssueKind::OutOfStock => write!(f, "{name} is out of stock"),
            StockIssueKind::Insufficient {
                available,
                requested,
            } => write!(
                f,
                "{name} only has {} in stock, but {} in cart",
                available.normalize(),
                requested.normalize()
            ),
        }
    }
}
