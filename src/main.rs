//! Interview With AI authentication backend

use interview_auth::{api, core, db};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles .env, CLI args, env vars, and config file)
    let config = match core::config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print error to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting authentication backend v{}", interview_auth::VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );
    info!(
        algorithm = %config.security.algorithm,
        access_token_expire_minutes = config.security.access_token_expire_minutes,
        "Token configuration"
    );

    let db_path = config.database.database_path();
    info!(path = ?db_path, "Opening user store");
    let db = Arc::new(db::DatabaseManager::new(
        &db_path,
        config.database.connection_pool_size,
        Duration::from_millis(config.database.busy_timeout),
    )?);
    let store = Arc::new(db::UserRepository::new(db));

    let server = api::ApiServer::new(&config, store)?;

    info!(
        url = %format!("http://{}:{}", config.server.host, config.server.port),
        "Server ready - starting to serve requests"
    );

    server.serve().await?;

    Ok(())
}
