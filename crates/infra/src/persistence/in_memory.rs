use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use shade_core::{AccountId, EventId, UserId};

use super::r#trait::{AccountRecord, Database, DatabaseError, SavedEvent};

#[derive(Debug, Clone)]
struct UserSecret {
    account_id: AccountId,
    encrypted_secret: String,
}

/// In-memory database.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    accounts: RwLock<HashMap<AccountId, AccountRecord>>,
    user_secrets: RwLock<HashMap<UserId, UserSecret>>,
    events: RwLock<Vec<SavedEvent>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the stored secret for a user (dev/test introspection; the
    /// HTTP surface never exposes secrets back to clients).
    pub fn user_secret(&self, user_id: &UserId) -> Option<(AccountId, String)> {
        let secrets = self.user_secrets.read().ok()?;
        secrets
            .get(user_id)
            .map(|s| (s.account_id, s.encrypted_secret.clone()))
    }

    fn poisoned() -> DatabaseError {
        DatabaseError::Storage("lock poisoned".to_string())
    }

    fn account_exists(&self, account_id: AccountId) -> Result<bool, DatabaseError> {
        let accounts = self.accounts.read().map_err(|_| Self::poisoned())?;
        Ok(accounts.contains_key(&account_id))
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    async fn get_account(&self, account_id: AccountId) -> Result<AccountRecord, DatabaseError> {
        let accounts = self.accounts.read().map_err(|_| Self::poisoned())?;
        accounts
            .get(&account_id)
            .cloned()
            .ok_or(DatabaseError::UnknownAccount(account_id))
    }

    async fn create_account(&self, record: AccountRecord) -> Result<(), DatabaseError> {
        let mut accounts = self.accounts.write().map_err(|_| Self::poisoned())?;
        accounts.insert(record.account_id, record);
        Ok(())
    }

    async fn associate_user_secret(
        &self,
        account_id: AccountId,
        user_id: &UserId,
        encrypted_secret: &str,
    ) -> Result<(), DatabaseError> {
        if !self.account_exists(account_id)? {
            return Err(DatabaseError::UnknownAccount(account_id));
        }

        let mut secrets = self.user_secrets.write().map_err(|_| Self::poisoned())?;
        // A repeated exchange replaces any previous secret for the user.
        secrets.insert(
            user_id.clone(),
            UserSecret {
                account_id,
                encrypted_secret: encrypted_secret.to_string(),
            },
        );
        Ok(())
    }

    async fn insert_event(
        &self,
        user_id: &UserId,
        account_id: AccountId,
        payload: &str,
    ) -> Result<SavedEvent, DatabaseError> {
        if !self.account_exists(account_id)? {
            return Err(DatabaseError::UnknownAccount(account_id));
        }

        let event = SavedEvent {
            event_id: EventId::new(),
            account_id,
            user_id: user_id.clone(),
            payload: payload.to_string(),
            created_at: Utc::now(),
        };

        let mut events = self.events.write().map_err(|_| Self::poisoned())?;
        events.push(event.clone());
        Ok(event)
    }

    async fn query_events(&self, user_id: &UserId) -> Result<Vec<SavedEvent>, DatabaseError> {
        let events = self.events.read().map_err(|_| Self::poisoned())?;
        Ok(events
            .iter()
            .filter(|e| &e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn check_health(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
