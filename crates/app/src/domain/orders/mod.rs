//! Order placement and lifecycle: the atomic cart-to-order transaction,
//! daily order ids, delivery OTPs, status history and the payment-gateway
//! callback path.

pub mod errors;
pub mod gateway;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use gateway::PaymentGateway;
pub use service::{MockOrdersService, OrdersService, PgOrdersService};
