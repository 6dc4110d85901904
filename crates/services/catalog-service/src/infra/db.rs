//! Database connection and migrations.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};
use sea_orm_migration::MigratorTrait;

use super::migrations::Migrator;
use common::DatabaseConfig;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect and apply pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(config).await?;

        Migrator::up(&db.connection, None).await?;
        tracing::info!("Database connected and migrations applied");

        Ok(db)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(5))
            .sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await?;
        Ok(Self { connection })
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// List all migrations with their applied status.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }

    /// Drop everything and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
