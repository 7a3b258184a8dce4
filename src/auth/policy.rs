/// Retry, resend and input-format policy of the login flow
use crate::config::{with_config, AuthConfig};
use crate::errors::ConfigError;
use std::time::Duration;

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPolicy {
    pub max_code_resend_attempts: u32,
    pub max_code_input_attempts: u32,
    pub resend_delay: Duration,
    pub code_length: usize,
    pub restart_command: String,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self::from_values(&AuthConfig::default())
    }
}

impl LoginPolicy {
    fn from_values(auth: &AuthConfig) -> Self {
        Self {
            max_code_resend_attempts: auth.max_code_resend_attempts,
            max_code_input_attempts: auth.max_code_input_attempts,
            resend_delay: Duration::from_secs(auth.code_resend_delay_secs),
            code_length: auth.code_length,
            restart_command: auth.restart_command.clone(),
        }
    }

    /// Build from an `[auth]` section, rejecting values that make the flow unusable
    pub fn from_auth_config(auth: &AuthConfig) -> Result<Self, ConfigError> {
        if auth.code_length == 0 {
            return Err(ConfigError::InvalidField {
                field: "auth.code_length".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if auth.max_code_input_attempts == 0 {
            return Err(ConfigError::InvalidField {
                field: "auth.max_code_input_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if auth.restart_command.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "auth.restart_command".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(Self::from_values(auth))
    }

    /// Policy from the loaded configuration
    pub fn from_config() -> Result<Self, ConfigError> {
        with_config(|cfg| Self::from_auth_config(&cfg.auth))
    }

    pub fn code_length_matches(&self, code: &str) -> bool {
        code.len() == self.code_length
    }

    pub fn inputs_exhausted(&self, input_count: u32) -> bool {
        input_count >= self.max_code_input_attempts
    }

    pub fn remaining_inputs(&self, input_count: u32) -> u32 {
        self.max_code_input_attempts.saturating_sub(input_count)
    }

    pub fn resends_exhausted(&self, resend_count: u32) -> bool {
        resend_count >= self.max_code_resend_attempts
    }

    /// Resends left once the resend about to happen is counted
    pub fn remaining_resends_after(&self, resend_count: u32) -> u32 {
        self.max_code_resend_attempts
            .saturating_sub(resend_count + 1)
    }
}

/// Keep only the digits of a submitted code ("1 2 3 4 5", "1-2-3-4-5" -> "12345")
pub fn normalize_code(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// International form check; returns the phone without separators
///
/// Spaces, dashes, dots and parentheses are dropped; the rest must be a
/// leading `+` followed by 7 to 15 digits.
pub fn validate_phone(raw: &str) -> Option<String> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    let digits = compact.strip_prefix('+')?;
    let valid = (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit());

    valid.then_some(compact)
}
