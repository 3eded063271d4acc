mod backend;
mod config;
mod cvs;
mod errors;
mod models;
mod ranking;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::HrApiClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails on a missing HR_API_BASE or unparsable numeric variables
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HR portal v{}", env!("CARGO_PKG_VERSION"));

    let backend = Arc::new(HrApiClient::new(
        config.hr_api_base.clone(),
        config.upload_timeout,
    ));
    info!(
        "HR backend client initialized ({}, upload timeout {}s)",
        config.hr_api_base,
        config.upload_timeout.as_secs()
    );
    match &config.export_dir {
        Some(dir) => info!("Saving exported reports to {}", dir.display()),
        None => info!("EXPORT_DIR not set; server-side report saving disabled"),
    }

    let state = AppState::new(backend, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
