/// Records owned by the credential store
///
/// `SessionRecord` is the durable result of a login. `LoginAttempt` is the
/// in-flight state of one, present only between a code request and the
/// terminal outcome of the flow.
use crate::proxy::ProxyConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account identifier (the chat user the login belongs to)
pub type AccountId = i64;

// =============================================================================
// SESSION RECORD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque reconnect token produced by the remote client
    pub token: String,
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Bare record with no profile fields
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: None,
            first_name: None,
            last_name: None,
            username: None,
            updated_at: Utc::now(),
        }
    }

    pub fn has_profile(&self) -> bool {
        self.user_id.is_some()
    }
}

// =============================================================================
// LOGIN ATTEMPT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    pub phone: String,
    pub api_id: i32,
    pub api_hash: String,
    pub proxy: Option<ProxyConfig>,
    /// Provider-issued handle of the most recent code request
    pub pending_handle: String,
    pub code_requested_at: DateTime<Utc>,
    pub resend_count: u32,
    pub input_count: u32,
    pub two_factor_required: bool,
    /// Digits the provider accepted, kept only while the password is pending
    pub accepted_code: Option<String>,
}

impl LoginAttempt {
    /// Fresh attempt right after the first code request
    pub fn new(
        phone: impl Into<String>,
        api_id: i32,
        api_hash: impl Into<String>,
        proxy: Option<ProxyConfig>,
        pending_handle: impl Into<String>,
    ) -> Self {
        Self {
            phone: phone.into(),
            api_id,
            api_hash: api_hash.into(),
            proxy,
            pending_handle: pending_handle.into(),
            code_requested_at: Utc::now(),
            resend_count: 0,
            input_count: 0,
            two_factor_required: false,
            accepted_code: None,
        }
    }

    /// Supersede the pending handle after an automatic resend
    pub fn reissue(&mut self, pending_handle: impl Into<String>) {
        self.pending_handle = pending_handle.into();
        self.code_requested_at = Utc::now();
        self.resend_count += 1;
        self.input_count = 0;
        self.two_factor_required = false;
        self.accepted_code = None;
    }

    /// Record that the code was accepted and the password is now required
    pub fn await_password(&mut self, accepted_code: impl Into<String>) {
        self.two_factor_required = true;
        self.accepted_code = Some(accepted_code.into());
    }
}
