//! Main entry point for the storefront API gateway

use std::sync::Arc;

use storefront_gateway::{api, config::Settings, AppState};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    init_tracing(&settings);

    info!("Starting storefront API gateway");
    info!(
        "Forwarding to products={} orders={} customers={}",
        settings.upstreams.products_url,
        settings.upstreams.orders_url,
        settings.upstreams.customers_url
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Create application state
    let state = Arc::new(AppState::new(settings)?);

    // Build the router
    let app = api::routes::create_router(state);

    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
