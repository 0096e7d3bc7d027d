//! Application settings and configuration management

use crate::error::{GatewayError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstreams: UpstreamsConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Base addresses of the three upstream services
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamsConfig {
    #[serde(default = "default_products_url")]
    pub products_url: String,
    #[serde(default = "default_orders_url")]
    pub orders_url: String,
    #[serde(default = "default_customers_url")]
    pub customers_url: String,
}

fn default_products_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_orders_url() -> String {
    "http://localhost:5012".to_string()
}

fn default_customers_url() -> String {
    "http://localhost:5003".to_string()
}

/// Outbound call budgets
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    /// Budget for a forwarded data-route call.
    #[serde(default = "default_request_ms")]
    pub request_ms: u64,
    /// Budget for each health probe.
    #[serde(default = "default_probe_ms")]
    pub probe_ms: u64,
}

fn default_request_ms() -> u64 {
    5000
}

fn default_probe_ms() -> u64 {
    1000
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("timeouts.request_ms", 5000)?
            .set_default("timeouts.probe_ms", 1000)?
            // Load from configuration file
            .add_source(
                File::with_name(path.as_ref().to_str().unwrap_or("config/default"))
                    .required(false),
            )
            // Override with environment variables (prefixed with GATEWAY__)
            .add_source(
                Environment::with_prefix("GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(GatewayError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        for (name, url) in [
            ("products", &self.upstreams.products_url),
            ("orders", &self.upstreams.orders_url),
            ("customers", &self.upstreams.customers_url),
        ] {
            if url.is_empty() {
                return Err(GatewayError::Config(config::ConfigError::Message(format!(
                    "Upstream '{}' must have a base URL",
                    name
                ))));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GatewayError::Config(config::ConfigError::Message(format!(
                    "Upstream '{}' URL '{}' must start with http:// or https://",
                    name, url
                ))));
            }
        }

        if self.timeouts.request_ms == 0 || self.timeouts.probe_ms == 0 {
            return Err(GatewayError::Config(config::ConfigError::Message(
                "Timeouts must be greater than 0".to_string(),
            )));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstreams: UpstreamsConfig::default(),
            timeouts: TimeoutConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            products_url: default_products_url(),
            orders_url: default_orders_url(),
            customers_url: default_customers_url(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_ms: default_request_ms(),
            probe_ms: default_probe_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
