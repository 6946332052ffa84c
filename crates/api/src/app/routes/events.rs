//! Event ingestion and retrieval for the session user.
//!
//! Both handlers run behind the session-cookie middleware; the user
//! identifier always comes from `SessionContext`, never from anything the
//! client could place in an ordinary header.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use shade_core::AccountId;
use shade_infra::Database;

use crate::app::{
    dto::{self, EventRequest},
    errors,
};
use crate::context::SessionContext;

pub async fn get_events(
    Extension(db): Extension<Arc<dyn Database>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match db.query_events(session.user_id()).await {
        Ok(events) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "events": events.iter().map(dto::event_to_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::database_error_to_response(e),
    }
}

pub async fn post_events(
    Extension(db): Extension<Arc<dyn Database>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<EventRequest>,
) -> axum::response::Response {
    let account_id: AccountId = match body.account_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id");
        }
    };

    match db
        .insert_event(session.user_id(), account_id, &body.payload)
        .await
    {
        Ok(saved) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "event_id": saved.event_id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::database_error_to_response(e),
    }
}
