//! Key-exchange endpoints.
//!
//! GET hands out an account's public key; POST stores a freshly minted
//! user's encrypted secret and returns the new session identifier as a
//! cookie. A session therefore only exists after a POST here, which is
//! why these routes carry no session precondition.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::{StatusCode, header},
    response::IntoResponse,
};

use shade_core::{AccountId, UserId};
use shade_infra::Database;

use crate::app::{
    dto::{ExchangeQuery, UserSecretRequest},
    errors,
};
use crate::middleware::SESSION_COOKIE;

pub async fn get_public_key(
    Extension(db): Extension<Arc<dyn Database>>,
    Query(query): Query<ExchangeQuery>,
) -> axum::response::Response {
    let Some(raw) = query.account_id else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_account_id",
            "account_id query parameter is required",
        );
    };

    let account_id: AccountId = match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id");
        }
    };

    match db.get_account(account_id).await {
        Ok(account) => (
            StatusCode::OK,
            Json(serde_json::json!({ "public_key": account.public_key })),
        )
            .into_response(),
        Err(e) => errors::database_error_to_response(e),
    }
}

pub async fn post_user_secret(
    Extension(db): Extension<Arc<dyn Database>>,
    Json(body): Json<UserSecretRequest>,
) -> axum::response::Response {
    let account_id: AccountId = match body.account_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id");
        }
    };

    let user_id = UserId::generate();

    match db
        .associate_user_secret(account_id, &user_id, &body.encrypted_user_secret)
        .await
    {
        Ok(()) => {
            let cookie = format!("{SESSION_COOKIE}={user_id}; Path=/; HttpOnly");
            (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response()
        }
        Err(e) => errors::database_error_to_response(e),
    }
}
