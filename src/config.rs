use std::env;

#[derive(Debug, Clone)]
pub struct StationConfig {
    pub database_url: String,
    pub api_token: String,
    pub listen_addr: String,
    pub event_log_path: String,
}

impl StationConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL environment variable not set")?;

        // Shared secret the sensor relay presents on ingest requests
        let api_token =
            env::var("API_TOKEN").map_err(|_| "API_TOKEN environment variable not set")?;

        if api_token.trim().is_empty() {
            return Err("API_TOKEN must not be empty".into());
        }

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let event_log_path =
            env::var("EVENT_LOG_PATH").unwrap_or_else(|_| "events.log".to_string());

        Ok(StationConfig {
            database_url,
            api_token,
            listen_addr,
            event_log_path,
        })
    }
}
