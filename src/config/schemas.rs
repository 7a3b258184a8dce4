/// Configuration schemas - all config structures defined once with defaults
///
/// Each struct is defined using the config_struct! macro which provides:
/// - Single-source definition (no repetition)
/// - Embedded defaults
/// - Serde support
use crate::auth::messages::Locale;
use crate::config_struct;
use crate::store::StorageBackend;

// ============================================================================
// TELEGRAM APPLICATION
// ============================================================================

config_struct! {
    /// Application credentials used for stored-token logins and probes
    pub struct TelegramConfig {
        /// App id from my.telegram.org
        api_id: i32 = 0,

        /// App hash from my.telegram.org
        api_hash: String = String::new(),

        /// Default relay descriptor `scheme:host:port[:user[:pass]]`, empty = direct
        proxy: String = String::new(),
    }
}

// ============================================================================
// LOGIN POLICY
// ============================================================================

config_struct! {
    /// Retry, resend and backoff limits of the login flow
    pub struct AuthConfig {
        /// Automatic code re-requests allowed after the code expires
        max_code_resend_attempts: u32 = 3,

        /// Code submissions allowed per issued code
        max_code_input_attempts: u32 = 3,

        /// Wait before re-requesting an expired code
        code_resend_delay_secs: u64 = 30,

        /// Digits in a verification code
        code_length: usize = 5,

        /// Command named in every terminal message
        restart_command: String = "/login".to_string(),
    }
}

// ============================================================================
// STORAGE
// ============================================================================

config_struct! {
    /// Credential store backend selection
    pub struct StorageConfig {
        backend: StorageBackend = StorageBackend::Sqlite,

        /// SQLite file, relative to the data directory unless absolute
        sqlite_file: String = "sessions.db".to_string(),

        /// JSON file, relative to the data directory unless absolute
        json_file: String = "sessions.json".to_string(),
    }
}

// ============================================================================
// MESSAGES
// ============================================================================

config_struct! {
    /// User-facing message catalog
    pub struct MessagesConfig {
        locale: Locale = Locale::English,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sub-configurations
    pub struct Config {
        telegram: TelegramConfig = TelegramConfig::default(),
        auth: AuthConfig = AuthConfig::default(),
        storage: StorageConfig = StorageConfig::default(),
        messages: MessagesConfig = MessagesConfig::default(),
    }
}
