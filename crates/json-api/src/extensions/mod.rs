//! Extension traits and conversion helpers.

mod decimal;
mod depot;
mod result;
mod tier;

pub(crate) use decimal::{DecimalExt as _, parse_money, parse_quantity};
pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use tier::parse_tier;
