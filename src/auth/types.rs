/// Caller-facing login types
///
/// The contract with the chat layer is `FailureKind`; messages are localized
/// text rendered from it.
use super::client::RemoteProfile;
use crate::config::with_config;
use crate::store::{LoginAttempt, SessionRecord};
use chrono::Utc;
use std::fmt;

// =============================================================================
// APP CREDENTIALS
// =============================================================================

/// Application id/hash pair a connection is opened with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub api_id: i32,
    pub api_hash: String,
}

impl AppCredentials {
    pub fn new(api_id: i32, api_hash: impl Into<String>) -> Self {
        Self {
            api_id,
            api_hash: api_hash.into(),
        }
    }

    /// Process-wide credentials from the `[telegram]` section
    pub fn from_config() -> Self {
        with_config(|cfg| Self::new(cfg.telegram.api_id, cfg.telegram.api_hash.clone()))
    }

    pub fn is_configured(&self) -> bool {
        self.api_id != 0 && !self.api_hash.is_empty()
    }
}

// =============================================================================
// FAILURE TAXONOMY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited { wait_seconds: u64 },
    InvalidCode { remaining_attempts: u32 },
    CodeExpired { remaining_resends: u32 },
    MalformedCode,
    PasswordRequired,
    PasswordInvalid,
    InvalidPhoneNumber,
    PhoneBanned,
    TransientRemoteError { description: String },
    NoPendingAttempt,
    VerificationInProgress,
    SessionUnauthorized,
    StorageFailure { description: String },
}

impl FailureKind {
    /// Stable identifier for logs and the admin CLI
    pub fn name(&self) -> &'static str {
        match self {
            FailureKind::RateLimited { .. } => "rate_limited",
            FailureKind::InvalidCode { .. } => "invalid_code",
            FailureKind::CodeExpired { .. } => "code_expired",
            FailureKind::MalformedCode => "malformed_code",
            FailureKind::PasswordRequired => "password_required",
            FailureKind::PasswordInvalid => "password_invalid",
            FailureKind::InvalidPhoneNumber => "invalid_phone_number",
            FailureKind::PhoneBanned => "phone_banned",
            FailureKind::TransientRemoteError { .. } => "transient_remote_error",
            FailureKind::NoPendingAttempt => "no_pending_attempt",
            FailureKind::VerificationInProgress => "verification_in_progress",
            FailureKind::SessionUnauthorized => "session_unauthorized",
            FailureKind::StorageFailure { .. } => "storage_failure",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::RateLimited { wait_seconds } => {
                write!(f, "{} ({}s)", self.name(), wait_seconds)
            }
            FailureKind::InvalidCode { remaining_attempts } => {
                write!(f, "{} ({} left)", self.name(), remaining_attempts)
            }
            FailureKind::CodeExpired { remaining_resends } => {
                write!(f, "{} ({} resends left)", self.name(), remaining_resends)
            }
            FailureKind::TransientRemoteError { description }
            | FailureKind::StorageFailure { description } => {
                write!(f, "{}: {}", self.name(), description)
            }
            _ => f.write_str(self.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFailure {
    pub kind: FailureKind,
    pub message: String,
    /// True when the flow may continue with another submission
    pub retryable: bool,
    /// Handle the next submission is verified against, when one is pending
    pub pending_handle: Option<String>,
}

// =============================================================================
// OUTCOMES AND STATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success {
        token: String,
        /// `None` when the post-login profile check failed
        profile: Option<RemoteProfile>,
        message: String,
    },
    CodeSent {
        pending_handle: String,
        message: String,
    },
    Failure(LoginFailure),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success { .. })
    }

    pub fn failure(&self) -> Option<&LoginFailure> {
        match self {
            LoginOutcome::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn failure_kind(&self) -> Option<&FailureKind> {
        self.failure().map(|f| &f.kind)
    }
}

/// Flow state derived from the stored attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    CodeSent,
    AwaitingPassword,
}

impl LoginState {
    pub fn from_attempt(attempt: Option<&LoginAttempt>) -> Self {
        match attempt {
            None => LoginState::Idle,
            Some(a) if a.two_factor_required => LoginState::AwaitingPassword,
            Some(_) => LoginState::CodeSent,
        }
    }
}

/// Result of a read-only token probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid(RemoteProfile),
    Unauthorized,
    Error(String),
}

impl TokenStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid(_))
    }
}

/// Session record carrying the profile captured at validation time
pub fn session_with_profile(token: &str, profile: &RemoteProfile) -> SessionRecord {
    SessionRecord {
        token: token.to_string(),
        user_id: Some(profile.id),
        first_name: Some(profile.first_name.clone()),
        last_name: profile.last_name.clone(),
        username: profile.username.clone(),
        updated_at: Utc::now(),
    }
}
