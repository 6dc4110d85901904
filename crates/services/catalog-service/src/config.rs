//! Catalog service configuration.

use std::env;

use common::{
    env_parse, AdminSeedConfig, ConfigError, DatabaseConfig, Environment, JwtConfig,
};

/// Catalog service configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub environment: Environment,
    /// Administrator created at startup in development
    pub admin_seed: Option<AdminSeedConfig>,
    /// Sample categories and products created at startup in development
    pub seed_sample_data: bool,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// `JWT_SECRET` has no default. The admin seed is only read in
    /// development and only when all three `ADMIN_*` variables are set.
    /// `SEED_SAMPLE_DATA` is likewise ignored outside development.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            min_connections: env_parse("DATABASE_MIN_CONNECTIONS")?
                .unwrap_or(defaults.min_connections),
        };

        let secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let jwt_defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret,
            algorithm: env::var("JWT_ALGORITHM").unwrap_or(jwt_defaults.algorithm),
            expiration_minutes: env_parse("ACCESS_TOKEN_EXPIRE_MINUTES")?
                .unwrap_or(jwt_defaults.expiration_minutes),
        };

        let environment = env_parse("ENVIRONMENT")?.unwrap_or(Environment::Development);

        let (admin_seed, seed_sample_data) = if environment.is_development() {
            (
                admin_seed_from_env(),
                env_parse("SEED_SAMPLE_DATA")?.unwrap_or(false),
            )
        } else {
            (None, false)
        };

        Ok(Self {
            database,
            jwt,
            environment,
            admin_seed,
            seed_sample_data,
        })
    }
}

fn admin_seed_from_env() -> Option<AdminSeedConfig> {
    let email = env::var("ADMIN_EMAIL").ok()?;
    let username = env::var("ADMIN_USERNAME").ok()?;
    let password = env::var("ADMIN_PASSWORD").ok()?;
    Some(AdminSeedConfig {
        email,
        username,
        password,
    })
}
