//! Infrastructure wiring for the API process.

use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use shade_infra::{AccountRecord, Database, InMemoryDatabase, PostgresDatabase};

/// Select and construct the persistence capability from the environment.
///
/// `DATABASE_URL` set => Postgres; otherwise an in-memory store, optionally
/// seeded with accounts from the `ACCOUNTS` JSON array (dev convenience).
pub async fn build_database() -> Arc<dyn Database> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::PgPool::connect(&url)
                .await
                .expect("failed to connect to Postgres");
            Arc::new(PostgresDatabase::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store");
            let db = InMemoryDatabase::new();
            seed_accounts(&db).await;
            Arc::new(db)
        }
    }
}

async fn seed_accounts(db: &InMemoryDatabase) {
    let Ok(raw) = std::env::var("ACCOUNTS") else {
        return;
    };

    let records: Vec<AccountRecord> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("ignoring unparseable ACCOUNTS value: {e}");
            return;
        }
    };

    for record in records {
        let account_id = record.account_id;
        if let Err(e) = db.create_account(record).await {
            tracing::warn!(%account_id, "failed to seed account: {e}");
        }
    }
}

/// Cross-origin policy stage.
///
/// With `CORS_ORIGIN` set, only that origin is allowed and credentialed
/// requests (the session cookie) are permitted. Without it the policy is
/// origin-agnostic and credentialless.
pub fn cors_layer() -> CorsLayer {
    if let Ok(origin) = std::env::var("CORS_ORIGIN") {
        if origin != "*" {
            match origin.parse::<HeaderValue>() {
                Ok(value) => {
                    return CorsLayer::new()
                        .allow_origin(value)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE])
                        .allow_credentials(true);
                }
                Err(_) => {
                    tracing::warn!(%origin, "ignoring unparseable CORS_ORIGIN value");
                }
            }
        }
    }

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
