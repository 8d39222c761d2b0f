//! HTTP routes for the terminal.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::protocol::{CommandRequest, CommandResponse, ErrorResponse, HealthReport};
use crate::terminal::TerminalHost;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub host: Arc<TerminalHost>,
    pub started: Instant,
}

impl GatewayState {
    pub fn new(host: Arc<TerminalHost>) -> Self {
        Self { host, started: Instant::now() }
    }
}

/// Build the router with all terminal routes.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/command", post(run_command))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Bind `addr` and serve `app` until the process is interrupted.
#[instrument(skip(app))]
pub async fn start_server(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Terminal HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;
    Ok(())
}

/// Handler for `POST /api/command`
async fn run_command(State(state): State<GatewayState>, Json(req): Json<CommandRequest>) -> Response {
    let Some(line) = req.command_line() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: "command is required".to_string() }),
        )
            .into_response();
    };
    let session_id = req.session().to_string();
    let output = state.host.execute(&session_id, line).await;
    Json(CommandResponse { output, session_id }).into_response()
}

/// Handler for `GET /api/health`
async fn health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".into(),
        sessions: state.host.registry().len().await,
        uptime_seconds: state.started.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}
