//! HTTP handlers.
//!
//! Each handler runs the relevant Slurm command(s) for the request at hand.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use exporter_core::{NodeStateSnapshot, UserJobSnapshot};
use exporter_metrics::ScrapeResult;
use tracing::warn;

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

/// Map a snapshot result onto the JSON envelope. Command failures are the
/// upstream's fault, hence 502.
fn snapshot_response<T: serde::Serialize>(
    what: &str,
    result: ScrapeResult<T>,
) -> axum::response::Response {
    match result {
        Ok(snapshot) => ApiResponse::ok(snapshot).into_response(),
        Err(e) => {
            warn!(snapshot = what, error = %e, "snapshot request failed");
            error_response(&e.to_string(), StatusCode::BAD_GATEWAY).into_response()
        }
    }
}

// ── Snapshots ──────────────────────────────────────────────────

/// GET /api/v1/nodes
pub async fn get_nodes(State(state): State<ApiState>) -> impl IntoResponse {
    let result: ScrapeResult<NodeStateSnapshot> = state.nodes.snapshot().await;
    snapshot_response("nodes", result)
}

/// GET /api/v1/users
pub async fn get_users(State(state): State<ApiState>) -> impl IntoResponse {
    let result: ScrapeResult<UserJobSnapshot> = state.users.snapshot().await;
    snapshot_response("users", result)
}

// ── Prometheus ─────────────────────────────────────────────────

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let body = state.registry.render().await;
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
