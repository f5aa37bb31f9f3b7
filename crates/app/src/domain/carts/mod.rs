//! Cart manager: one cart per user, created lazily, revalidated against the
//! live catalog on every read, destroyed only by order placement.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::CartsServiceError;
pub use service::{CartsService, MockCartsService, PgCartsService};
