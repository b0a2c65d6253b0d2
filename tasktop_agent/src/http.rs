//! HTTP surface of the agent: a JSON metrics endpoint, a raw report
//! download, and a small index at the root.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::error;

use crate::assemble::{assemble, run_report, AssembleError};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/metrics", get(api_metrics))
        .route("/api/report", get(api_report))
        .with_state(state)
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "service": "tasktop_agent",
        "endpoints": {
            "/api/metrics": "Structured snapshot of host metrics",
            "/api/report": "Raw report text as a download",
        }
    }))
}

/// Every hit runs the full pipeline. A missing script is the caller's
/// configuration problem (404); a script that ran and failed is ours (500).
async fn api_metrics(State(state): State<Arc<AppState>>) -> Response {
    match assemble(&state).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e @ AssembleError::MissingScript { .. }) => {
            error!("{e}");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
        Err(AssembleError::Execution { bash, sh }) => {
            error!("script execution failed under both interpreters");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to execute script",
                    "details": format!("bash: {bash}; sh: {sh}"),
                    "platform": std::env::consts::OS,
                })),
            )
                .into_response()
        }
    }
}

async fn api_report(State(state): State<Arc<AppState>>) -> Response {
    match run_report(&state.script).await {
        Ok(out) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=system-report.txt",
                ),
            ],
            out.stdout,
        )
            .into_response(),
        Err(e) => {
            error!("report generation failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error generating report").into_response()
        }
    }
}
