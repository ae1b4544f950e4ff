use log::{error, info, warn};
use std::net::SocketAddr;

use rusty_stock::bootstrap::ensure_bootstrap_user;
use rusty_stock::config::ServerConfig;
use rusty_stock::error::{Result, StockError};
use rusty_stock::routes;
use rusty_stock::state::AppState;
use rusty_stock::storage::Database;

#[tokio::main]
async fn main() {
    // Initialize env
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load config from environment
    let config = ServerConfig::from_env()?;

    info!(
        "Configuration: host={}, port={}, algorithm={:?}, token_ttl={}s",
        config.host,
        config.port,
        config.jwt_algorithm,
        config.token_ttl.as_secs()
    );

    // Open the store and make sure the schema exists
    let db = Database::connect(&config.database_url, config.max_db_connections).await?;
    db.initialize().await?;

    if let Some(user) = &config.bootstrap_user {
        ensure_bootstrap_user(&db, user).await?;
    }

    let routes = routes::api(AppState::from_config(db.clone(), &config));

    // Build the server address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| StockError::ConfigError(format!("Failed to parse server address: {}", e)))?;

    let (bound, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .map_err(|e| StockError::SystemError(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Starting Rusty Stock server on {}", bound);
    server.await;

    info!("Shutting down, closing store connections");
    db.close().await;
    Ok(())
}
