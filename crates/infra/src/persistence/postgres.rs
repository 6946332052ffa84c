//! Postgres-backed persistence implementation.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `DatabaseError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | DatabaseError | Scenario |
//! |------------|----------------------|---------------|----------|
//! | Database (foreign key violation) | `23503` | `UnknownAccount` | Event/secret references an account that does not exist |
//! | Io / PoolTimedOut / PoolClosed | N/A | `Unavailable` | Connection failures, exhausted or closed pool |
//! | Other | Any other | `Storage` | Constraint violations, decode failures, etc. |
//!
//! ## Thread Safety
//!
//! `PostgresDatabase` is `Send + Sync`; all operations go through the SQLx
//! connection pool, which manages connections across tasks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use shade_core::{AccountId, EventId, UserId};

use super::r#trait::{AccountRecord, Database, DatabaseError, SavedEvent};

/// Postgres-backed database.
///
/// Schema lives in `crates/infra/migrations/0001_init.sql`. Referential
/// integrity between events/secrets and accounts is enforced by the
/// database (foreign keys), surfaced here as `UnknownAccount`.
#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: Arc<PgPool>,
}

impl PostgresDatabase {
    /// Create a new PostgresDatabase with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    #[instrument(skip(self), err)]
    async fn get_account(&self, account_id: AccountId) -> Result<AccountRecord, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT account_id, name, public_key
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_account", e))?;

        let Some(row) = row else {
            return Err(DatabaseError::UnknownAccount(account_id));
        };

        Ok(AccountRecord {
            account_id: AccountId::from_uuid(
                row.try_get::<Uuid, _>("account_id")
                    .map_err(|e| map_sqlx_error("get_account", e))?,
            ),
            name: row
                .try_get("name")
                .map_err(|e| map_sqlx_error("get_account", e))?,
            public_key: row
                .try_get("public_key")
                .map_err(|e| map_sqlx_error("get_account", e))?,
        })
    }

    #[instrument(skip(self, record), fields(account_id = %record.account_id), err)]
    async fn create_account(&self, record: AccountRecord) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (account_id, name, public_key)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(record.account_id.as_uuid())
        .bind(&record.name)
        .bind(&record.public_key)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_account", e))?;

        Ok(())
    }

    #[instrument(skip(self, encrypted_secret), err)]
    async fn associate_user_secret(
        &self,
        account_id: AccountId,
        user_id: &UserId,
        encrypted_secret: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO user_secrets (user_id, account_id, encrypted_secret, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET account_id = EXCLUDED.account_id,
                          encrypted_secret = EXCLUDED.encrypted_secret
            "#,
        )
        .bind(user_id.as_str())
        .bind(account_id.as_uuid())
        .bind(encrypted_secret)
        .bind(Utc::now())
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DatabaseError::UnknownAccount(account_id)
            } else {
                map_sqlx_error("associate_user_secret", e)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self, payload), err)]
    async fn insert_event(
        &self,
        user_id: &UserId,
        account_id: AccountId,
        payload: &str,
    ) -> Result<SavedEvent, DatabaseError> {
        let event = SavedEvent {
            event_id: EventId::new(),
            account_id,
            user_id: user_id.clone(),
            payload: payload.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO events (event_id, account_id, user_id, payload, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.event_id.as_uuid())
        .bind(event.account_id.as_uuid())
        .bind(event.user_id.as_str())
        .bind(&event.payload)
        .bind(event.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DatabaseError::UnknownAccount(account_id)
            } else {
                map_sqlx_error("insert_event", e)
            }
        })?;

        Ok(event)
    }

    #[instrument(skip(self), err)]
    async fn query_events(&self, user_id: &UserId) -> Result<Vec<SavedEvent>, DatabaseError> {
        // EventIds are UUIDv7, so ordering by event_id is insertion order.
        let rows = sqlx::query(
            r#"
            SELECT event_id, account_id, user_id, payload, created_at
            FROM events
            WHERE user_id = $1
            ORDER BY event_id ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("query_events", e))?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            events.push(SavedEvent {
                event_id: EventId::from_uuid(
                    row.try_get::<Uuid, _>("event_id")
                        .map_err(|e| map_sqlx_error("query_events", e))?,
                ),
                account_id: AccountId::from_uuid(
                    row.try_get::<Uuid, _>("account_id")
                        .map_err(|e| map_sqlx_error("query_events", e))?,
                ),
                user_id: UserId::from(
                    row.try_get::<String, _>("user_id")
                        .map_err(|e| map_sqlx_error("query_events", e))?,
                ),
                payload: row
                    .try_get("payload")
                    .map_err(|e| map_sqlx_error("query_events", e))?,
                created_at: row
                    .try_get("created_at")
                    .map_err(|e| map_sqlx_error("query_events", e))?,
            });
        }

        Ok(events)
    }

    #[instrument(skip(self), err)]
    async fn check_health(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("check_health", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, e: sqlx::Error) -> DatabaseError {
    match &e {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            DatabaseError::Unavailable(format!("{operation}: {e}"))
        }
        _ => DatabaseError::Storage(format!("{operation}: {e}")),
    }
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}
