//! Router assembly for the gateway's HTTP surface

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::api::handlers;
use crate::middleware::request_log::RequestLogLayer;
use crate::AppState;

/// Build the gateway router. The route table is the routing logic: every
/// path is statically bound to one backend. The request logger wraps every
/// route, the health check included.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/:id", get(handlers::get_product))
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route("/customers", get(handlers::list_customers))
        .route("/customers/:id", get(handlers::get_customer))
        .route("/health", get(handlers::health))
        .layer(RequestLogLayer::new())
        .with_state(state)
}
