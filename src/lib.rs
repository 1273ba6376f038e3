pub mod client;
pub mod config;
mod db;
pub mod errors;
pub mod games;
mod http;
mod middleware;
pub mod models;
pub mod state;

use axum::{Router, middleware as axum_middleware};
use config::Config;
use errors::AppError;
use middleware::{cors_layer, create_rate_limiter, rate_limit_middleware};
use state::AppState;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub fn create_app(state: AppState) -> Router {
    let rate_limiter = create_rate_limiter(state.config.rate_limit_per_minute);
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .merge(http::create_http_routes(state))
        .fallback(http::not_found_handler)
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(rate_limiter.clone(), req, next)
        }))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load()?;
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState::new(config).await?;
    let pool = state.db.clone();
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shutting down server...");
    pool.close().await;
    tracing::info!("Database connection closed");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
