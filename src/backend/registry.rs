//! Static registry of the upstream services behind the gateway

use crate::config::UpstreamsConfig;

/// Logical upstream services the gateway forwards to.
///
/// Every route is statically bound to one of these at definition time, so
/// there is no unknown-service case at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Products,
    Orders,
    Customers,
}

impl Service {
    /// Lowercase identifier used in paths, logs and the health report.
    pub fn name(&self) -> &'static str {
        match self {
            Service::Products => "products",
            Service::Orders => "orders",
            Service::Customers => "customers",
        }
    }

    /// Capitalized name used in client-facing error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Service::Products => "Products",
            Service::Orders => "Orders",
            Service::Customers => "Customers",
        }
    }
}

/// Address of a single upstream service, fixed at startup.
#[derive(Debug, Clone)]
pub struct Backend {
    pub service: Service,
    pub base_url: String,
    /// Path probed by the health check, the service's listing endpoint.
    pub probe_path: String,
}

impl Backend {
    fn new(service: Service, base_url: &str) -> Self {
        Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            probe_path: format!("/{}", service.name()),
        }
    }

    /// Join a path suffix onto the backend's base address.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Immutable mapping from logical service to backend address.
pub struct BackendRegistry {
    backends: [Backend; 3],
}

impl BackendRegistry {
    /// Build the registry from the configured upstream addresses.
    pub fn from_config(upstreams: &UpstreamsConfig) -> Self {
        Self {
            backends: [
                Backend::new(Service::Products, &upstreams.products_url),
                Backend::new(Service::Orders, &upstreams.orders_url),
                Backend::new(Service::Customers, &upstreams.customers_url),
            ],
        }
    }

    pub fn get(&self, service: Service) -> &Backend {
        match service {
            Service::Products => &self.backends[0],
            Service::Orders => &self.backends[1],
            Service::Customers => &self.backends[2],
        }
    }

    pub fn all(&self) -> &[Backend] {
        &self.backends
    }
}
