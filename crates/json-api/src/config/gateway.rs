//! Payment Gateway Config

use clap::Args;

/// Payment gateway settings.
#[derive(Debug, Args)]
pub struct GatewayConfig {
    /// Shared secret used to verify gateway callback signatures
    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub razorpay_key_secret: String,
}
