//! Credential store
//!
//! Durable mapping from account to session record, plus the in-flight
//! `LoginAttempt` of each account. The orchestrator only sees the
//! `CredentialStore` trait; two backends implement it with identical
//! behavior:
//!
//! ```text
//! store/
//! ├── types.rs   - SessionRecord, LoginAttempt
//! ├── sqlite.rs  - rusqlite backend (one row per account per table)
//! └── json.rs    - flat JSON file backend
//! ```

pub mod json;
pub mod sqlite;
pub mod types;

pub use json::JsonFileCredentialStore;
pub use sqlite::SqliteCredentialStore;
pub use types::{AccountId, LoginAttempt, SessionRecord};

use crate::config::StorageConfig;
use crate::errors::StoreError;
use crate::logger::{self, LogTag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Storage backend selection (`[storage] backend`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Json,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sqlite => f.write_str("sqlite"),
            StorageBackend::Json => f.write_str("json"),
        }
    }
}

/// Key-value collaborator holding sessions and login attempts
///
/// Implementations are synchronous; every call is short and local.
pub trait CredentialStore: Send + Sync {
    fn get_session(&self, account: AccountId) -> Result<Option<SessionRecord>, StoreError>;

    /// Create or overwrite the session record of an account
    fn set_session(&self, account: AccountId, record: &SessionRecord) -> Result<(), StoreError>;

    /// Remove the session record, returns whether one existed
    fn clear_token(&self, account: AccountId) -> Result<bool, StoreError>;

    fn get_login_attempt(&self, account: AccountId) -> Result<Option<LoginAttempt>, StoreError>;

    /// Insert or replace the single pending attempt of an account
    fn upsert_login_attempt(
        &self,
        account: AccountId,
        attempt: &LoginAttempt,
    ) -> Result<(), StoreError>;

    /// Remove the pending attempt, returns whether one existed
    fn clear_login_attempt(&self, account: AccountId) -> Result<bool, StoreError>;

    /// Accounts with a session or a pending attempt, ascending
    fn list_accounts(&self) -> Result<Vec<AccountId>, StoreError>;

    fn get_token(&self, account: AccountId) -> Result<Option<String>, StoreError> {
        Ok(self.get_session(account)?.map(|record| record.token))
    }

    /// Store a bare token, dropping any profile fields of the previous record
    fn set_token(&self, account: AccountId, token: &str) -> Result<(), StoreError> {
        self.set_session(account, &SessionRecord::from_token(token))
    }
}

/// Open the backend selected by the storage configuration
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn CredentialStore>, StoreError> {
    let store: Arc<dyn CredentialStore> = match config.backend {
        StorageBackend::Sqlite => {
            let path = crate::paths::resolve_data_file(&config.sqlite_file);
            Arc::new(SqliteCredentialStore::open(&path)?)
        }
        StorageBackend::Json => {
            let path = crate::paths::resolve_data_file(&config.json_file);
            Arc::new(JsonFileCredentialStore::open(&path)?)
        }
    };

    logger::info(
        LogTag::Store,
        &format!("Credential store opened ({} backend)", config.backend),
    );
    Ok(store)
}
