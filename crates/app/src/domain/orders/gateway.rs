//! Payment-gateway signature verification.
//!
//! Online payments are authorised against the gateway by the client; the
//! backend only sees the callback, which it authenticates by recomputing the
//! HMAC-SHA256 of `"{order_id}|{payment_id}"` under the shared key secret.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct PaymentGateway {
    key_secret: Zeroizing<String>,
}

impl PaymentGateway {
    #[must_use]
    pub fn new(key_secret: String) -> Self {
        Self {
            key_secret: Zeroizing::new(key_secret),
        }
    }

    /// The hex signature the gateway would produce for this order/payment
    /// pair.
    #[must_use]
    pub fn sign(&self, gateway_order_id: &str, gateway_payment_id: &str) -> String {
        let Ok(mut mac) = HmacSha256::new_from_slice(self.key_secret.as_bytes()) else {
            // HMAC accepts keys of any length; new_from_slice cannot fail.
            return String::new();
        };

        mac.update(gateway_order_id.as_bytes());
        mac.update(b"|");
        mac.update(gateway_payment_id.as_bytes());

        mac.finalize()
            .into_bytes()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }

    /// Check a callback signature against the expected one.
    #[must_use]
    pub fn verify_signature(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> bool {
        self.sign(gateway_order_id, gateway_payment_id) == signature
    }
}

impl fmt::Debug for PaymentGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentGateway").finish_non_exhaustive()
    }
}
