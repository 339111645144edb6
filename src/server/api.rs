use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::contexts::health::{self, HealthReport};
use crate::contexts::{LlmGateway, generate};
use crate::data::{GenerationRequest, GenerationResult};

pub const GENERATE_ROUTE: &str = "/api/generate-tasks";
pub const STATUS_ROUTE: &str = "/api/status";

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<LlmGateway>,
}

impl AppState {
    pub fn new(gateway: LlmGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    success: bool,
    data: GenerationResult,
    timestamp: DateTime<Utc>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(GENERATE_ROUTE, post(generate_tasks))
        .route(STATUS_ROUTE, get(status))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let provider = state.gateway.provider().kind;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, provider = %provider, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn generate_tasks(State(state): State<AppState>, body: Bytes) -> Response {
    // A body that is not a JSON object at all is a server-side failure, not a
    // validation failure; blank or absent fields are caught by validation.
    let request: GenerationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable generation request body");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    match generate(&state.gateway, &request).await {
        Ok(data) => {
            tracing::info!(route = GENERATE_ROUTE, status = 200, "generation served");
            let body = GenerateResponse {
                success: true,
                data,
                timestamp: Utc::now(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            tracing::warn!(
                route = GENERATE_ROUTE,
                status = status.as_u16(),
                error = %e,
                "generation failed"
            );
            error_response(status, &e.user_message())
        }
    }
}

async fn status(State(state): State<AppState>) -> Json<HealthReport> {
    let report = health::check(&state.gateway).await;
    tracing::info!(route = STATUS_ROUTE, llm = ?report.llm, "status served");
    Json(report)
}
