//! Address store boundary: lookup with ownership checks and the default
//! delivery address. Address management itself lives elsewhere.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::AddressesServiceError;
pub use service::PgAddressesService;
