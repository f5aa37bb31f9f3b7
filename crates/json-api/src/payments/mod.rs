//! Payment gateway callback endpoint.

mod handlers;

pub(crate) use handlers::verify;
