//! Checkout Handlers

pub(crate) mod delivery_fee;
pub(crate) mod summary;
pub(crate) mod validate;
