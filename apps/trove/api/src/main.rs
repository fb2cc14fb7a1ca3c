use axum_helpers::server::{close_database, create_production_app};
use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::sql;
use migration::Migrator;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[derive(Parser)]
#[command(name = "trove_api", version)]
#[command(about = "User account service: registration, login and profiles")]
struct Cli {
    /// Do not apply pending database migrations at startup
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let cli = Cli::parse();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    info!(driver = %config.database.driver, "Connecting to database");
    let db = sql::connect_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("Database connection failed: {}", e))?;

    if cli.skip_migrations {
        info!("Skipping database migrations");
    } else {
        sql::run_migrations::<Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Database migration failed: {}", e))?;
    }

    let signer = Arc::new(axum_helpers::JwtAuth::new(&config.jwt));
    let state = AppState::new(config, db, signer);

    let app = api::app(&state);

    info!("Starting trove API with graceful shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        close_database(state.db, "primary"),
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Trove API shutdown complete");
    Ok(())
}
