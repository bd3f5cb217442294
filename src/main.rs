mod codec;
mod config;
mod database;
mod decoder;
mod http;
mod models;
mod rain;
mod utils;

use log::{error, info, warn};
use tokio::net::TcpListener;

use config::StationConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match StationConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Best-effort schema setup; a reachable database will also accept inserts
    if let Err(e) = database::init_schema(&config.database_url).await {
        warn!("Schema initialization failed: {}", e);
    }

    info!("Starting weather station ingest service");

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!("Listening on {}", config.listen_addr);

    let app = http::router(config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Program terminated by user. Exiting gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");
    info!("Shutdown signal received");
}
