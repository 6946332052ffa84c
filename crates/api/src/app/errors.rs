use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shade_infra::DatabaseError;

pub fn database_error_to_response(err: DatabaseError) -> axum::response::Response {
    match err {
        DatabaseError::UnknownAccount(id) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("unknown account: {id}"),
        ),
        DatabaseError::Storage(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
        DatabaseError::Unavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Fallback for a matched path with an unsupported method.
pub async fn method_not_allowed() -> axum::response::Response {
    json_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        "method not allowed",
    )
}

/// Fallback for paths outside the route table.
pub async fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}
