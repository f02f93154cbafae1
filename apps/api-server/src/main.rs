//! # Daybook API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use daybook_core::ports::{PasswordService, TokenService};
use daybook_infra::{Argon2PasswordService, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Daybook API Server on {}:{}",
        config.host,
        config.port
    );

    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new(config.password_policy.clone()));

    let state = AppState::new(&config, tokens.clone(), passwords).await;
    let db = state.db.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    close_database(db).await;
    Ok(())
}

#[cfg(feature = "postgres")]
async fn close_database(db: Option<Arc<daybook_infra::DatabaseConnections>>) {
    let Some(db) = db else {
        return;
    };

    match Arc::try_unwrap(db) {
        Ok(connections) => {
            if let Err(e) = connections.close().await {
                tracing::error!("Failed to close database pool: {}", e);
            }
        }
        Err(_) => tracing::warn!("Database pool still shared at shutdown, dropping it"),
    }
}

#[cfg(not(feature = "postgres"))]
async fn close_database(_db: Option<Arc<daybook_infra::DatabaseConnections>>) {}
