//! Configuration module

pub mod settings;

pub use settings::{LoggingConfig, ServerConfig, Settings, TimeoutConfig, UpstreamsConfig};
