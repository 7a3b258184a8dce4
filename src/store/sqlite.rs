/// SQLite credential store
///
/// One row per account in `sessions` and one in `login_attempts`. Timestamps
/// are RFC3339 text, the optional proxy is a JSON column.
use super::types::{AccountId, LoginAttempt, SessionRecord};
use super::CredentialStore;
use crate::errors::StoreError;
use crate::logger::{self, LogTag};
use crate::proxy::ProxyConfig;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

// =============================================================================
// DATABASE SCHEMA DEFINITIONS
// =============================================================================

const SCHEMA_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    account_id INTEGER PRIMARY KEY,
    token TEXT NOT NULL,
    user_id INTEGER,
    first_name TEXT,
    last_name TEXT,
    username TEXT,
    updated_at TEXT NOT NULL
);
"#;

const SCHEMA_LOGIN_ATTEMPTS: &str = r#"
CREATE TABLE IF NOT EXISTS login_attempts (
    account_id INTEGER PRIMARY KEY,
    phone TEXT NOT NULL,
    api_id INTEGER NOT NULL,
    api_hash TEXT NOT NULL,
    proxy_json TEXT,
    pending_handle TEXT NOT NULL,
    code_requested_at TEXT NOT NULL,
    resend_count INTEGER NOT NULL DEFAULT 0,
    input_count INTEGER NOT NULL DEFAULT 0,
    two_factor_required INTEGER NOT NULL DEFAULT 0,
    accepted_code TEXT
);

CREATE INDEX IF NOT EXISTS idx_login_attempts_phone ON login_attempts(phone);
"#;

pub struct SqliteCredentialStore {
    conn: Mutex<Connection>,
}

impl SqliteCredentialStore {
    /// Open (or create) the database file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 30000;
        ",
        )?;

        let store = Self::with_connection(conn)?;
        logger::debug(
            LogTag::Store,
            &format!("SQLite credential store at {}", path.display()),
        );
        Ok(store)
    }

    /// Private in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_tables()?;
        Ok(store)
    }

    fn initialize_tables(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA_SESSIONS)?;
        conn.execute_batch(SCHEMA_LOGIN_ATTEMPTS)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

// =============================================================================
// ROW CONVERSION
// =============================================================================

fn parse_timestamp(account: AccountId, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            account,
            reason: format!("bad timestamp '{}': {}", raw, e),
        })
}

/// Raw columns of a `sessions` row before timestamp parsing
struct SessionRow {
    token: String,
    user_id: Option<i64>,
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            token: row.get(0)?,
            user_id: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            username: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_record(self, account: AccountId) -> Result<SessionRecord, StoreError> {
        Ok(SessionRecord {
            updated_at: parse_timestamp(account, &self.updated_at)?,
            token: self.token,
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
        })
    }
}

struct AttemptRow {
    phone: String,
    api_id: i32,
    api_hash: String,
    proxy_json: Option<String>,
    pending_handle: String,
    code_requested_at: String,
    resend_count: u32,
    input_count: u32,
    two_factor_required: bool,
    accepted_code: Option<String>,
}

impl AttemptRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            phone: row.get(0)?,
            api_id: row.get(1)?,
            api_hash: row.get(2)?,
            proxy_json: row.get(3)?,
            pending_handle: row.get(4)?,
            code_requested_at: row.get(5)?,
            resend_count: row.get(6)?,
            input_count: row.get(7)?,
            two_factor_required: row.get(8)?,
            accepted_code: row.get(9)?,
        })
    }

    fn into_attempt(self, account: AccountId) -> Result<LoginAttempt, StoreError> {
        let proxy = match self.proxy_json {
            Some(raw) => Some(serde_json::from_str::<ProxyConfig>(&raw).map_err(|e| {
                StoreError::Corrupt {
                    account,
                    reason: format!("bad proxy column: {}", e),
                }
            })?),
            None => None,
        };

        Ok(LoginAttempt {
            code_requested_at: parse_timestamp(account, &self.code_requested_at)?,
            phone: self.phone,
            api_id: self.api_id,
            api_hash: self.api_hash,
            proxy,
            pending_handle: self.pending_handle,
            resend_count: self.resend_count,
            input_count: self.input_count,
            two_factor_required: self.two_factor_required,
            accepted_code: self.accepted_code,
        })
    }
}

// =============================================================================
// STORE OPERATIONS
// =============================================================================

impl CredentialStore for SqliteCredentialStore {
    fn get_session(&self, account: AccountId) -> Result<Option<SessionRecord>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT token, user_id, first_name, last_name, username, updated_at
                 FROM sessions WHERE account_id = ?1",
                params![account],
                SessionRow::from_row,
            )
            .optional()?;

        row.map(|r| r.into_record(account)).transpose()
    }

    fn set_session(&self, account: AccountId, record: &SessionRecord) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO sessions
             (account_id, token, user_id, first_name, last_name, username, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                account,
                record.token,
                record.user_id,
                record.first_name,
                record.last_name,
                record.username,
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn clear_token(&self, account: AccountId) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM sessions WHERE account_id = ?1",
            params![account],
        )?;
        Ok(removed > 0)
    }

    fn get_login_attempt(&self, account: AccountId) -> Result<Option<LoginAttempt>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT phone, api_id, api_hash, proxy_json, pending_handle, code_requested_at,
                        resend_count, input_count, two_factor_required, accepted_code
                 FROM login_attempts WHERE account_id = ?1",
                params![account],
                AttemptRow::from_row,
            )
            .optional()?;

        row.map(|r| r.into_attempt(account)).transpose()
    }

    fn upsert_login_attempt(
        &self,
        account: AccountId,
        attempt: &LoginAttempt,
    ) -> Result<(), StoreError> {
        let proxy_json = attempt
            .proxy
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO login_attempts
             (account_id, phone, api_id, api_hash, proxy_json, pending_handle, code_requested_at,
              resend_count, input_count, two_factor_required, accepted_code)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                account,
                attempt.phone,
                attempt.api_id,
                attempt.api_hash,
                proxy_json,
                attempt.pending_handle,
                attempt.code_requested_at.to_rfc3339(),
                attempt.resend_count,
                attempt.input_count,
                attempt.two_factor_required,
                attempt.accepted_code,
            ],
        )?;
        Ok(())
    }

    fn clear_login_attempt(&self, account: AccountId) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM login_attempts WHERE account_id = ?1",
            params![account],
        )?;
        Ok(removed > 0)
    }

    fn list_accounts(&self) -> Result<Vec<AccountId>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT account_id FROM sessions
             UNION
             SELECT account_id FROM login_attempts
             ORDER BY account_id ASC",
        )?;

        let accounts = stmt
            .query_map([], |row| row.get::<_, AccountId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }
}
