//! Checkout validator: read-only summaries and the pre-order stock gate.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CheckoutServiceError;
pub use service::{CheckoutService, MockCheckoutService, PgCheckoutService};
