//! # Blogicum
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::HttpServer;

use blog_server::telemetry::{TelemetryConfig, init_telemetry};
use blog_server::{AppConfig, AppState, app};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Blogicum on {}:{}", config.host, config.port);

    let state = AppState::from_config(&config).await.map_err(|e| {
        tracing::error!("Failed to load templates: {:?}", e);
        std::io::Error::other(e.to_string())
    })?;

    HttpServer::new(move || app(state.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
