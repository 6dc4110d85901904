//! Catalog Service Library
//!
//! Users, categories and products behind a storage-agnostic unit of work,
//! plus token issuing and request authorization. The HTTP gateway embeds
//! this crate; the `Migrate` commands run through [`run_migrations`].

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::{ConfigError, DatabaseConfig};

use crate::config::CatalogConfig;
use crate::infra::{Database, MemoryStore, Persistence, UnitOfWork};
use crate::service::{seed_admin, seed_catalog, JwtTokens, Services};

/// Open the configured store. Postgres migrations are applied on connect.
pub async fn connect_storage(
    config: &DatabaseConfig,
) -> Result<Arc<dyn UnitOfWork>, Box<dyn std::error::Error>> {
    if config.is_memory() {
        info!("Using in-process storage");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let db = Database::connect(config).await?;
    Ok(Arc::new(Persistence::new(db)))
}

/// Build every service over `uow`, signing tokens with `config.jwt`.
pub fn build_services(
    uow: Arc<dyn UnitOfWork>,
    config: &CatalogConfig,
) -> Result<Services, ConfigError> {
    let tokens = Arc::new(JwtTokens::new(&config.jwt)?);
    Ok(Services::new(uow, tokens))
}

/// Connect storage, apply the development seeds and wire the services.
pub async fn bootstrap(config: &CatalogConfig) -> Result<Services, Box<dyn std::error::Error>> {
    let uow = connect_storage(&config.database).await?;
    let services = build_services(uow.clone(), config)?;

    if let Some(seed) = &config.admin_seed {
        seed_admin(uow.clone(), seed).await?;
    }
    if config.seed_sample_data {
        seed_catalog(uow).await?;
    }

    Ok(services)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &DatabaseConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.is_memory() {
        return Err("migrations need a Postgres DATABASE_URL".into());
    }

    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
