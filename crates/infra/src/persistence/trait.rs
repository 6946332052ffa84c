use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use shade_core::{AccountId, EventId, UserId};

/// An account registered with the collector.
///
/// The `public_key` is the JWK-shaped JSON document clients encrypt their
/// per-user secrets against. This layer never inspects it; it is stored and
/// served verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: AccountId,
    pub name: String,
    pub public_key: JsonValue,
}

/// An event persisted for a user.
///
/// `payload` is the opaque ciphertext string submitted by the client. The
/// server cannot decrypt it and returns it byte-for-byte on retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEvent {
    pub event_id: EventId,
    pub account_id: AccountId,
    pub user_id: UserId,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

/// Persistence operation error.
///
/// These are **infrastructure errors** (unknown references, storage faults,
/// connectivity) as opposed to domain errors. Mapping to HTTP statuses
/// happens at the API layer, not here.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A referenced account does not exist.
    #[error("unknown account: {0}")]
    UnknownAccount(AccountId),

    /// The underlying storage rejected or failed the operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// The underlying storage could not be reached.
    #[error("database unavailable: {0}")]
    Unavailable(String),
}

/// The persistence capability the request router is constructed against.
///
/// Implementations must be safe for concurrent use; the HTTP layer shares a
/// single handle across all in-flight requests and performs no locking of
/// its own.
///
/// Events are append-only and scoped to the submitting user:
/// `query_events` must return exactly the events previously inserted for
/// that user id, in insertion order, and nothing belonging to anyone else.
#[async_trait]
pub trait Database: Send + Sync {
    /// Look up an account and its public key.
    async fn get_account(&self, account_id: AccountId) -> Result<AccountRecord, DatabaseError>;

    /// Register an account (bootstrap/seeding path, not exposed over HTTP).
    async fn create_account(&self, record: AccountRecord) -> Result<(), DatabaseError>;

    /// Store the encrypted user secret minted during key exchange.
    ///
    /// A repeated exchange for the same user replaces the stored secret.
    async fn associate_user_secret(
        &self,
        account_id: AccountId,
        user_id: &UserId,
        encrypted_secret: &str,
    ) -> Result<(), DatabaseError>;

    /// Append an event for a user. The payload is treated as opaque.
    async fn insert_event(
        &self,
        user_id: &UserId,
        account_id: AccountId,
        payload: &str,
    ) -> Result<SavedEvent, DatabaseError>;

    /// Return all events for a user, in insertion order.
    async fn query_events(&self, user_id: &UserId) -> Result<Vec<SavedEvent>, DatabaseError>;

    /// Probe the backing store (used by the status endpoint).
    async fn check_health(&self) -> Result<(), DatabaseError>;
}
