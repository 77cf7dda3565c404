use actix_web::{web, App, HttpServer};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod api;
mod auth;
mod cli;
mod config;
mod db;
mod logging;
mod shutdown;
#[cfg(test)]
mod test_support;

use crate::api::{application::ApplicationService, job::JobService, validation};
use crate::auth::TokenVerifier;
use crate::cli::{Cli, Command};
use crate::db::{PgStore, Store};
use crate::shutdown::ShutdownCoordinator;

/// Failures that abort startup
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to run database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config::Config {
        database_url,
        jwt_secret,
        jwt_issuer,
        max_payload_size,
        max_db_connections,
        log_dir,
        bind_address,
        port,
    } = config::Config::from_env()?;

    // Log files will be created as: logs/info.2025-03-01.log, logs/error.2025-03-01.log
    logging::init(&log_dir)?;

    let pool = db::connection::get_connection(&database_url, max_db_connections).await?;
    info!("Database connection pool established");

    // Auto-migrate on every start; `migrate` stops here
    db::migrations::run_migrations(&pool).await?;
    if cli.command() == Command::Migrate {
        pool.close().await;
        return Ok(());
    }

    info!("Starting job-board application");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);
    info!("  - Token issuer check: {}", jwt_issuer.as_deref().unwrap_or("disabled"));

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
    let store_data: web::Data<dyn Store> = web::Data::from(store.clone());
    let verifier = web::Data::new(TokenVerifier::new(&jwt_secret, jwt_issuer));
    let job_service = web::Data::new(JobService::new(store.clone()));
    let application_service = web::Data::new(ApplicationService::new(store));

    let server = HttpServer::new(move || {
        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(store_data.clone())
            .app_data(verifier.clone())
            .app_data(job_service.clone())
            .app_data(application_service.clone())
            .app_data(payload_config)
            .app_data(validation::query_config())
            .configure(api::configure)
    });

    info!("Server starting on http://{}:{}", bind_address, port);

    let server = server.bind((bind_address.as_str(), port))?.run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);
    coordinator.wait_for_shutdown().await?;
    Ok(())
}
