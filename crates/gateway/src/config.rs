//! Gateway configuration.

use std::env;

use catalog_service_lib::config::CatalogConfig;
use common::{env_parse, ConfigError, ServiceConfig};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address, request deadline and environment
    pub server: ServiceConfig,
    /// Storage, token and bootstrap settings for the embedded catalog
    pub catalog: CatalogConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let catalog = CatalogConfig::from_env()?;
        let defaults = ServiceConfig::default();

        let server = ServiceConfig {
            service_name: defaults.service_name,
            host: env::var("APP_HOST").unwrap_or(defaults.host),
            port: env_parse("APP_PORT")?.unwrap_or(defaults.port),
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.request_timeout_seconds),
            environment: catalog.environment,
        };

        if server.request_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "REQUEST_TIMEOUT_SECONDS",
                "must be positive",
            ));
        }

        Ok(Self { server, catalog })
    }
}
