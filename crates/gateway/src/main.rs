//! Catalog API - HTTP server and database tooling.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_service_lib::MigrateAction;
use gateway_lib::config::GatewayConfig;

#[derive(Parser)]
#[command(name = "catalog-api")]
#[command(about = "Product catalog HTTP API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Overrides APP_HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides APP_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = GatewayConfig::from_env()?;

    match cli.command {
        Commands::Serve { host, port } => {
            gateway_lib::run_server(host, port, config).await?;
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            catalog_service_lib::run_migrations(&config.catalog.database, migrate_action).await?;
        }
    }

    Ok(())
}
