use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod db;
pub mod error;
mod extract;
mod handlers;
mod models;
mod routes;
mod schema;

use crate::auth::AuthConfig;
use crate::config::AppConfig;
use crate::db::DbPool;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub auth_config: AuthConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::parse();

    tracing::info!("Starting food diary backend server");

    // Connections are opened lazily on first checkout
    let pool = db::establish_connection_pool(&config)?;
    tracing::info!("Database connection pool initialized");

    let state = AppState {
        pool,
        auth_config: AuthConfig::from_app_config(&config),
    };

    let app = routes::create_app(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
