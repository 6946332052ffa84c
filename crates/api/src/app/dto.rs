use serde::Deserialize;

use shade_infra::SavedEvent;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ExchangeQuery {
    pub account_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserSecretRequest {
    pub account_id: String,
    pub encrypted_user_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub account_id: String,
    pub payload: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn event_to_json(event: &SavedEvent) -> serde_json::Value {
    serde_json::json!({
        "event_id": event.event_id.to_string(),
        "account_id": event.account_id.to_string(),
        "payload": event.payload,
        "created_at": event.created_at.to_rfc3339(),
    })
}
