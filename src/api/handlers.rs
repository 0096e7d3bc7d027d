//! Route handlers forwarding to the upstream services
//!
//! Each data route issues exactly one outbound call to its statically bound
//! backend; the health route fans out one probe per backend.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use reqwest::Method;
use serde_json::Value;

use crate::backend::registry::Service;
use crate::error::Result;
use crate::gateway::forwarder::ProxiedResponse;
use crate::gateway::health::HealthReport;
use crate::AppState;

pub async fn list_products(State(state): State<Arc<AppState>>) -> Result<ProxiedResponse> {
    let backend = state.registry.get(Service::Products);
    state
        .forwarder
        .forward(backend, Method::GET, "/products", None, None)
        .await
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<ProxiedResponse> {
    let backend = state.registry.get(Service::Products);
    state
        .forwarder
        .forward(
            backend,
            Method::GET,
            &format!("/products/{}", id),
            None,
            Some("Product"),
        )
        .await
}

pub async fn list_orders(State(state): State<Arc<AppState>>) -> Result<ProxiedResponse> {
    let backend = state.registry.get(Service::Orders);
    state
        .forwarder
        .forward(backend, Method::GET, "/orders", None, None)
        .await
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(order): Json<Value>,
) -> Result<ProxiedResponse> {
    let backend = state.registry.get(Service::Orders);
    state
        .forwarder
        .forward(backend, Method::POST, "/orders", Some(&order), None)
        .await
}

pub async fn list_customers(State(state): State<Arc<AppState>>) -> Result<ProxiedResponse> {
    let backend = state.registry.get(Service::Customers);
    state
        .forwarder
        .forward(backend, Method::GET, "/customers", None, None)
        .await
}

pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<ProxiedResponse> {
    let backend = state.registry.get(Service::Customers);
    state
        .forwarder
        .forward(
            backend,
            Method::GET,
            &format!("/customers/{}", id),
            None,
            Some("Customer"),
        )
        .await
}

/// Aggregate health of the three upstream services. Always returns 200; a
/// failing backend only degrades the reported status.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(state.health.check(&state.registry).await)
}
