//! Mandi JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mandi_app::{context::AppContext, domain::orders::PaymentGateway};

use crate::{config::ServerConfig, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod carts;
mod checkout;
mod config;
mod extensions;
mod healthcheck;
mod orders;
mod payments;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Mandi JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .init();

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let gateway = PaymentGateway::new(config.gateway.razorpay_key_secret.clone());

    let app = match AppContext::from_database_url(&config.database.database_url, gateway).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("cart")
                .push(Router::with_path("add").post(carts::add::handler))
                .push(Router::with_path("update-quantity").put(carts::update_quantity::handler))
                .push(Router::with_path("item").delete(carts::remove::handler))
                .push(Router::with_path("{user_uuid}").get(carts::get::handler)),
        )
        .push(
            Router::with_path("checkout")
                .push(Router::with_path("validate").post(checkout::validate::handler))
                .push(
                    Router::with_path("delivery-fee/{user_uuid}")
                        .get(checkout::delivery_fee::handler),
                )
                .push(Router::with_path("{user_uuid}").get(checkout::summary::handler)),
        )
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(Router::with_path("user/{user_uuid}").get(orders::user_orders::handler))
                .push(Router::with_path("{order_uuid}").get(orders::get::handler)),
        )
        .push(Router::with_path("payment/verify").post(payments::verify::handler));

    let doc = OpenApi::new("Mandi API", "0.1.0").merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
