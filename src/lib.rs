//! Storefront API Gateway
//!
//! A single HTTP entry point that forwards requests to the products, orders
//! and customers services and exposes an aggregate health check.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;

pub use error::{GatewayError, Result};

use std::time::Duration;

use backend::registry::BackendRegistry;
use gateway::{forwarder::Forwarder, health::HealthAggregator};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: config::Settings,
    pub registry: BackendRegistry,
    pub forwarder: Forwarder,
    pub health: HealthAggregator,
}

impl AppState {
    /// Build the shared state from loaded settings.
    pub fn new(settings: config::Settings) -> Result<Self> {
        let registry = BackendRegistry::from_config(&settings.upstreams);
        let forwarder = Forwarder::new(Duration::from_millis(settings.timeouts.request_ms))?;
        let health = HealthAggregator::new(Duration::from_millis(settings.timeouts.probe_ms))?;

        Ok(Self {
            settings,
            registry,
            forwarder,
            health,
        })
    }
}
