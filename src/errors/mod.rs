/// Error types for tgauth
///
/// Remote, store, proxy and configuration failures each get their own enum.
/// The login orchestrator maps all of them into `FailureKind` before anything
/// reaches a caller; these types stay internal to the collaborators.
use thiserror::Error;

// =============================================================================
// REMOTE SESSION CLIENT ERRORS
// =============================================================================

/// Outcomes a remote session client reports instead of success
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Rate limited by provider: wait {seconds} seconds")] RateLimited {
        seconds: u64,
    },

    #[error("Account is protected by a two-factor password")] PasswordRequired,

    #[error("Verification code is invalid")] InvalidCode,

    #[error("Verification code has expired")] CodeExpired,

    #[error("Two-factor password is invalid")] PasswordInvalid,

    #[error("Phone number is invalid")] InvalidPhoneNumber,

    #[error("Phone number is banned")] PhoneBanned,

    #[error("Session is not authorized")] Unauthorized,

    #[error("Connection failed: {0}")] Connection(String),

    #[error("Remote error: {0}")] Other(String),
}

impl RemoteError {
    /// Errors that resolve themselves by waiting or by a new input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RemoteError::RateLimited { .. }
                | RemoteError::PasswordRequired
                | RemoteError::InvalidCode
                | RemoteError::CodeExpired
        )
    }
}

/// Failures of a stored-token validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Stored session is no longer authorized")] Unauthorized,

    #[error("Validation failed: {0}")] Remote(#[from] RemoteError),
}

// =============================================================================
// CREDENTIAL STORE ERRORS
// =============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")] Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")] Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")] Io(#[from] std::io::Error),

    #[error("Corrupt record for account {account}: {reason}")] Corrupt {
        account: i64,
        reason: String,
    },

    #[error("Store lock poisoned")] LockPoisoned,
}

impl StoreError {
    /// Busy/locked databases and IO hiccups may succeed on a later call
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            StoreError::Io(_) => true,
            _ => false,
        }
    }
}

// =============================================================================
// PROXY DESCRIPTOR ERRORS
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("Proxy descriptor is empty")] Empty,

    #[error("Unsupported proxy scheme: {0}")] UnsupportedScheme(String),

    #[error("Proxy descriptor is missing the {0}")] MissingField(&'static str),

    #[error("Invalid proxy port: {0}")] InvalidPort(String),

    #[error("Proxy descriptor has {0} fields, at most 5 are allowed")] TooManyFields(usize),
}

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file '{path}': {source}")] Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {reason}")] Parse {
        path: String,
        reason: String,
    },

    #[error("Failed to serialize config: {0}")] Serialize(String),

    #[error("Config already initialized")] AlreadyInitialized,

    #[error("Config not initialized. Call load_config() first.")] NotInitialized,

    #[error("Config lock poisoned")] LockPoisoned,

    #[error("Invalid config field '{field}': {reason}")] InvalidField {
        field: String,
        reason: String,
    },
}
