//! Health check listener for the hosting platform.
//!
//! Serves no application data; it only proves the process is alive.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone)]
struct HealthState {
    start_time: Instant,
}

pub fn router() -> Router {
    let state = HealthState {
        start_time: Instant::now(),
    };
    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Bind `0.0.0.0:<port>` and serve health checks until the process exits
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Health check listener started");
    axum::serve(listener, router()).await?;
    Ok(())
}
