//! Catalog gateway: read access to product records and the guarded stock
//! decrement used by order placement.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::PgCatalogService;
