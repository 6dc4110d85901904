//! Catalog API Library
//!
//! The HTTP boundary of the catalog: routing, bearer-token gates, request
//! validation and OpenAPI docs over the embedded catalog services.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::time::Duration;

use tracing::info;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the HTTP server, overriding the configured listen address.
pub async fn run_server(
    host: Option<String>,
    port: Option<u16>,
    mut config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    // Storage, services and the development admin
    let services = catalog_service_lib::bootstrap(&config.catalog).await?;
    let state = AppState::new(&services);

    let app = create_router(
        state,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(
        environment = ?config.server.environment,
        "{} listening on {}", config.server.service_name, addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
