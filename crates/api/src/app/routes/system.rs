//! Operational endpoints.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use shade_infra::Database;

use crate::app::errors;

/// Health status. Method-agnostic: probes disagree on GET vs HEAD.
pub async fn status(Extension(db): Extension<Arc<dyn Database>>) -> axum::response::Response {
    match db.check_health().await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "unhealthy",
            e.to_string(),
        ),
    }
}
