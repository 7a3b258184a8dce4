/// Flat JSON file credential store
///
/// The whole state lives in memory and is rewritten to disk after every
/// mutation (temp file + rename, so a crash never leaves a half-written file).
use super::types::{AccountId, LoginAttempt, SessionRecord};
use super::CredentialStore;
use crate::errors::StoreError;
use crate::logger::{self, LogTag};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct JsonState {
    #[serde(default)]
    sessions: BTreeMap<AccountId, SessionRecord>,
    #[serde(default)]
    login_attempts: BTreeMap<AccountId, LoginAttempt>,
}

pub struct JsonFileCredentialStore {
    path: PathBuf,
    state: Mutex<JsonState>,
}

impl JsonFileCredentialStore {
    /// Load the file, starting empty when it does not exist yet
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let state = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                JsonState::default()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            JsonState::default()
        };

        logger::debug(
            LogTag::Store,
            &format!(
                "JSON credential store at {} ({} sessions, {} pending attempts)",
                path.display(),
                state.sessions.len(),
                state.login_attempts.len()
            ),
        );

        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(state),
        })
    }

    /// Apply a mutation and persist the result
    ///
    /// The in-memory state only changes once the file was written.
    fn mutate<R>(&self, f: impl FnOnce(&mut JsonState) -> R) -> Result<R, StoreError> {
        let mut state = self.state.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = state.clone();
        let result = f(&mut next);
        self.persist(&next)?;
        *state = next;
        Ok(result)
    }

    fn read<R>(&self, f: impl FnOnce(&JsonState) -> R) -> Result<R, StoreError> {
        let state = self.state.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&state))
    }

    fn persist(&self, state: &JsonState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let rendered = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, rendered)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn get_session(&self, account: AccountId) -> Result<Option<SessionRecord>, StoreError> {
        self.read(|state| state.sessions.get(&account).cloned())
    }

    fn set_session(&self, account: AccountId, record: &SessionRecord) -> Result<(), StoreError> {
        self.mutate(|state| {
            state.sessions.insert(account, record.clone());
        })
    }

    fn clear_token(&self, account: AccountId) -> Result<bool, StoreError> {
        self.mutate(|state| state.sessions.remove(&account).is_some())
    }

    fn get_login_attempt(&self, account: AccountId) -> Result<Option<LoginAttempt>, StoreError> {
        self.read(|state| state.login_attempts.get(&account).cloned())
    }

    fn upsert_login_attempt(
        &self,
        account: AccountId,
        attempt: &LoginAttempt,
    ) -> Result<(), StoreError> {
        self.mutate(|state| {
            state.login_attempts.insert(account, attempt.clone());
        })
    }

    fn clear_login_attempt(&self, account: AccountId) -> Result<bool, StoreError> {
        self.mutate(|state| state.login_attempts.remove(&account).is_some())
    }

    fn list_accounts(&self) -> Result<Vec<AccountId>, StoreError> {
        self.read(|state| {
            state
                .sessions
                .keys()
                .chain(state.login_attempts.keys())
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
    }
}
