//! The Pulse HTTP server.
//!
//! A thin shim over [`ScoreCoordinator`]:
//! - `POST /score`: answers submission or chat event
//! - `GET /summary`: latest summary for a user
//! - `GET /health`: health check
//!
//! All algorithmic content lives below the coordinator; handlers only map
//! outcomes to status codes. Persistence failures never surface here; the
//! only 500s are unexpected internal faults, reported with their message.

use crate::types::{ErrorBody, QueuedBody, ScoreRequest};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pulse_memory::{ChatResponse, ScoreCoordinator};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

const DEFAULT_USER: &str = "default";

#[derive(Clone)]
struct AppState {
    coordinator: Arc<ScoreCoordinator>,
}

/// The gateway HTTP server.
pub struct GatewayServer {
    coordinator: Arc<ScoreCoordinator>,
    host: String,
    port: u16,
}

impl GatewayServer {
    pub fn new(coordinator: Arc<ScoreCoordinator>, host: &str, port: u16) -> Self {
        Self {
            coordinator,
            host: host.to_string(),
            port,
        }
    }

    /// Build the router; separated from `serve` so tests can drive it
    /// without binding a socket.
    pub fn router(coordinator: Arc<ScoreCoordinator>) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/score", post(handle_score))
            .route("/summary", get(handle_summary))
            .layer(CorsLayer::permissive())
            .with_state(AppState { coordinator })
    }

    /// Bind and serve until the process exits.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let app = Self::router(self.coordinator);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Pulse gateway listening on {}", addr);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    user: Option<String>,
}

/// GET /summary: latest summary for a user, 404 when none exists.
async fn handle_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Response {
    let user = query
        .user
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER.to_string());

    match state.coordinator.latest_summary(&user).await {
        Ok(Some(summary)) => (StatusCode::OK, Json(summary)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new("No history for user")),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

/// POST /score: either an answers submission or a chat event.
async fn handle_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ScoreRequest>,
) -> Response {
    let user = request
        .user
        .clone()
        .filter(|u| !u.trim().is_empty())
        .or_else(|| header_value(&headers, "x-pulse-user"))
        .unwrap_or_else(|| DEFAULT_USER.to_string());
    let nickname = request
        .nickname
        .clone()
        .or_else(|| header_value(&headers, "x-pulse-nickname"));

    if request.is_chat() {
        let message = match request.message.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody::new("Invalid chat message")),
                )
                    .into_response()
            }
        };
        return match state
            .coordinator
            .submit_chat(&user, nickname.as_deref(), &message)
            .await
        {
            Ok(ChatResponse::Queued { count, threshold }) => {
                (StatusCode::ACCEPTED, Json(QueuedBody::new(count, threshold))).into_response()
            }
            Ok(ChatResponse::Scored(summary)) => (StatusCode::OK, Json(*summary)).into_response(),
            Err(e) => internal_error(e),
        };
    }

    let Some(answers) = request.answers else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(
                "Invalid payload: 'answers' must be a list of strings.",
            )),
        )
            .into_response();
    };

    match state
        .coordinator
        .submit_answers(&user, nickname.as_deref(), &answers)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => internal_error(e),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The outermost fault boundary: report the message, nothing else.
fn internal_error(e: anyhow::Error) -> Response {
    tracing::error!("Request failed: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(e.to_string())),
    )
        .into_response()
}
