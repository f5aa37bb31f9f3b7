//! Customer tier extraction.

use mandi_core::CustomerTier;
use salvo::prelude::StatusError;

/// Parse an optional tier field/query value; absence means consumer.
pub(crate) fn parse_tier(raw: Option<&str>) -> Result<CustomerTier, StatusError> {
    match raw {
        None => Ok(CustomerTier::default()),
        Some(raw) => raw
            .parse::<CustomerTier>()
            .map_err(|error| StatusError::bad_request().brief(error.to_string())),
    }
}
