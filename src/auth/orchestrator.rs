/// Login orchestrator
///
/// Drives an account through code request, code verification, the optional
/// two-factor password and session persistence. State between calls lives in
/// the credential store as a `LoginAttempt`; everything else is per call.
///
/// Connection discipline: every connection opened here is closed before the
/// call returns. Bodies that use a connection run in a separate fn and the
/// result is only returned after `disconnect().await`.
use super::client::{ConnectParams, RemoteProfile, RemoteSession, SessionConnector};
use super::locks::{AccountGuard, AccountLocks};
use super::messages::{mask_code, shorten_secret, Messages};
use super::policy::{normalize_code, validate_phone, LoginPolicy};
use super::types::{
    session_with_profile, AppCredentials, FailureKind, LoginFailure, LoginOutcome, LoginState,
    TokenStatus,
};
use super::validator::SessionValidator;
use crate::config::with_config;
use crate::errors::{ConfigError, RemoteError, StoreError, ValidationError};
use crate::logger::{self, LogTag};
use crate::proxy::ProxyConfig;
use crate::store::{AccountId, CredentialStore, LoginAttempt, SessionRecord};
use std::sync::Arc;

/// Result of verifying a code on an open connection
enum CodeStep {
    Done(LoginOutcome),
    /// The provider reported the code as expired; the connection must be
    /// closed before a new code is requested
    Expired,
}

pub struct LoginOrchestrator {
    connector: Arc<dyn SessionConnector>,
    store: Arc<dyn CredentialStore>,
    policy: LoginPolicy,
    messages: Messages,
    validator: SessionValidator,
    locks: AccountLocks,
    /// Relay used when a call does not name one
    default_proxy: Option<ProxyConfig>,
}

impl LoginOrchestrator {
    /// `app_credentials` are used for stored-token logins and probes
    pub fn new(
        connector: Arc<dyn SessionConnector>,
        store: Arc<dyn CredentialStore>,
        policy: LoginPolicy,
        messages: Messages,
        app_credentials: AppCredentials,
    ) -> Self {
        let validator = SessionValidator::new(connector.clone(), app_credentials);
        Self {
            connector,
            store,
            policy,
            messages,
            validator,
            locks: AccountLocks::new(),
            default_proxy: None,
        }
    }

    pub fn with_default_proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.default_proxy = proxy;
        self
    }

    /// Orchestrator configured from the loaded `[auth]`, `[messages]` and `[telegram]` sections
    pub fn from_config(
        connector: Arc<dyn SessionConnector>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ConfigError> {
        let policy = LoginPolicy::from_config()?;
        let locale = with_config(|cfg| cfg.messages.locale);
        let messages = Messages::new(locale, policy.restart_command.clone(), policy.code_length);
        let credentials = AppCredentials::from_config();
        let default_proxy = default_proxy_from(&with_config(|cfg| cfg.telegram.proxy.clone()))?;

        if !credentials.is_configured() {
            logger::warning(
                LogTag::Config,
                "No [telegram] api_id/api_hash configured, stored-token logins will fail",
            );
        }

        Ok(Self::new(connector, store, policy, messages, credentials)
            .with_default_proxy(default_proxy))
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn policy(&self) -> &LoginPolicy {
        &self.policy
    }

    fn effective_proxy(&self, proxy: Option<ProxyConfig>) -> Option<ProxyConfig> {
        proxy.or_else(|| self.default_proxy.clone())
    }

    // =========================================================================
    // START
    // =========================================================================

    /// Request a verification code and persist a fresh attempt
    pub async fn start(
        &self,
        account: AccountId,
        credentials: &AppCredentials,
        phone: &str,
        proxy: Option<ProxyConfig>,
    ) -> LoginOutcome {
        let Some(_guard) = self.locks.try_acquire(account) else {
            return self.in_progress(account);
        };

        let Some(phone) = validate_phone(phone) else {
            return self.fail(account, FailureKind::InvalidPhoneNumber, false, None);
        };
        let proxy = self.effective_proxy(proxy);

        let params = ConnectParams {
            api_id: credentials.api_id,
            api_hash: credentials.api_hash.clone(),
            proxy: proxy.clone(),
            token: None,
        };

        logger::info(
            LogTag::Auth,
            &format!(
                "Account {}: requesting verification code{}",
                account,
                proxy
                    .as_ref()
                    .map(|p| format!(" via {}", p.address()))
                    .unwrap_or_default()
            ),
        );

        let handle = match self.request_code(&params, &phone).await {
            Ok(handle) => handle,
            Err(RemoteError::RateLimited { seconds }) => {
                return self.fail(
                    account,
                    FailureKind::RateLimited {
                        wait_seconds: seconds,
                    },
                    true,
                    None,
                );
            }
            Err(e) => return self.fail(account, Self::terminal_kind(e), false, None),
        };

        let attempt = LoginAttempt::new(
            phone,
            credentials.api_id,
            credentials.api_hash.clone(),
            proxy,
            handle.clone(),
        );
        if let Err(e) = self.store.upsert_login_attempt(account, &attempt) {
            return self.storage_failure(account, e);
        }

        logger::info(
            LogTag::Auth,
            &format!(
                "Account {}: code sent (handle {})",
                account,
                shorten_secret(&handle)
            ),
        );

        LoginOutcome::CodeSent {
            pending_handle: handle,
            message: self.messages.code_sent(),
        }
    }

    // =========================================================================
    // SUBMIT
    // =========================================================================

    /// Submit a code, a password, or both for the pending attempt
    pub async fn submit(
        &self,
        account: AccountId,
        code: Option<&str>,
        password: Option<&str>,
    ) -> LoginOutcome {
        let Some(_guard) = self.locks.try_acquire(account) else {
            return self.in_progress(account);
        };

        let attempt = match self.store.get_login_attempt(account) {
            Ok(Some(attempt)) => attempt,
            Ok(None) => return self.fail(account, FailureKind::NoPendingAttempt, false, None),
            Err(e) => return self.storage_failure(account, e),
        };

        match (code, password) {
            (Some(raw), _) => {
                let code = normalize_code(raw);
                self.submit_code(account, attempt, code, password).await
            }
            (None, Some(password)) if attempt.two_factor_required => {
                self.submit_password(account, attempt, password).await
            }
            (None, _) => self.malformed(account, &attempt),
        }
    }

    async fn submit_code(
        &self,
        account: AccountId,
        mut attempt: LoginAttempt,
        code: String,
        password: Option<&str>,
    ) -> LoginOutcome {
        if !self.policy.code_length_matches(&code) {
            return self.malformed(account, &attempt);
        }

        if self.policy.inputs_exhausted(attempt.input_count) {
            return self.fail_terminal(
                account,
                FailureKind::InvalidCode {
                    remaining_attempts: 0,
                },
            );
        }

        attempt.input_count += 1;
        if let Err(e) = self.store.upsert_login_attempt(account, &attempt) {
            return self.storage_failure(account, e);
        }

        logger::info(
            LogTag::Auth,
            &format!(
                "Account {}: verifying code {} (input {}/{})",
                account,
                mask_code(&code),
                attempt.input_count,
                self.policy.max_code_input_attempts
            ),
        );

        let mut session = match self.connector.connect(&Self::attempt_params(&attempt)).await {
            Ok(session) => session,
            Err(e) => return self.code_error(account, &mut attempt, e, true),
        };
        let step = self
            .verify_on(session.as_mut(), account, &mut attempt, &code, password, true)
            .await;
        session.disconnect().await;

        match step {
            CodeStep::Done(outcome) => outcome,
            CodeStep::Expired => self.resend_code(account, attempt, true).await,
        }
    }

    /// Password-only submission while the password is pending
    ///
    /// The accepted code is replayed on a fresh connection first. No code
    /// input attempt is consumed.
    async fn submit_password(
        &self,
        account: AccountId,
        mut attempt: LoginAttempt,
        password: &str,
    ) -> LoginOutcome {
        let Some(code) = attempt.accepted_code.clone() else {
            return self.malformed(account, &attempt);
        };

        logger::info(
            LogTag::Auth,
            &format!("Account {}: submitting two-factor password", account),
        );

        let mut session = match self.connector.connect(&Self::attempt_params(&attempt)).await {
            Ok(session) => session,
            Err(e) => return self.code_error(account, &mut attempt, e, false),
        };
        let step = self
            .verify_on(
                session.as_mut(),
                account,
                &mut attempt,
                &code,
                Some(password),
                false,
            )
            .await;
        session.disconnect().await;

        match step {
            CodeStep::Done(outcome) => outcome,
            CodeStep::Expired => self.resend_code(account, attempt, false).await,
        }
    }

    /// Verify `code` (and `password` when the provider asks for one)
    async fn verify_on(
        &self,
        session: &mut dyn RemoteSession,
        account: AccountId,
        attempt: &mut LoginAttempt,
        code: &str,
        password: Option<&str>,
        consumed_input: bool,
    ) -> CodeStep {
        match session
            .verify_code(&attempt.phone, code, &attempt.pending_handle)
            .await
        {
            Ok(()) => CodeStep::Done(self.complete_login(session, account).await),
            Err(RemoteError::PasswordRequired) => {
                if attempt.accepted_code.as_deref() != Some(code) {
                    attempt.await_password(code);
                    if let Err(e) = self.store.upsert_login_attempt(account, attempt) {
                        return CodeStep::Done(self.storage_failure(account, e));
                    }
                }

                match password {
                    Some(password) => CodeStep::Done(
                        self.finish_password(session, account, attempt, password)
                            .await,
                    ),
                    None => {
                        logger::info(
                            LogTag::Auth,
                            &format!("Account {}: two-factor password required", account),
                        );
                        CodeStep::Done(self.fail(
                            account,
                            FailureKind::PasswordRequired,
                            true,
                            Some(attempt.pending_handle.clone()),
                        ))
                    }
                }
            }
            Err(RemoteError::CodeExpired) => {
                logger::warning(
                    LogTag::Auth,
                    &format!(
                        "Account {}: verification code expired (handle {})",
                        account,
                        shorten_secret(&attempt.pending_handle)
                    ),
                );
                CodeStep::Expired
            }
            Err(e) => CodeStep::Done(self.code_error(account, attempt, e, consumed_input)),
        }
    }

    async fn finish_password(
        &self,
        session: &mut dyn RemoteSession,
        account: AccountId,
        attempt: &LoginAttempt,
        password: &str,
    ) -> LoginOutcome {
        match session.verify_password(password).await {
            Ok(()) => self.complete_login(session, account).await,
            Err(RemoteError::PasswordInvalid) => self.fail(
                account,
                FailureKind::PasswordInvalid,
                true,
                Some(attempt.pending_handle.clone()),
            ),
            Err(RemoteError::RateLimited { seconds }) => self.fail(
                account,
                FailureKind::RateLimited {
                    wait_seconds: seconds,
                },
                true,
                Some(attempt.pending_handle.clone()),
            ),
            Err(e) => self.fail_terminal(account, Self::terminal_kind(e)),
        }
    }

    /// Map a verification error that is neither a password request nor an expiry
    fn code_error(
        &self,
        account: AccountId,
        attempt: &mut LoginAttempt,
        error: RemoteError,
        consumed_input: bool,
    ) -> LoginOutcome {
        match error {
            RemoteError::RateLimited { seconds } => {
                if consumed_input {
                    attempt.input_count = attempt.input_count.saturating_sub(1);
                    if let Err(e) = self.store.upsert_login_attempt(account, attempt) {
                        return self.storage_failure(account, e);
                    }
                }
                self.fail(
                    account,
                    FailureKind::RateLimited {
                        wait_seconds: seconds,
                    },
                    true,
                    Some(attempt.pending_handle.clone()),
                )
            }
            RemoteError::InvalidCode => {
                let remaining = self.policy.remaining_inputs(attempt.input_count);
                if remaining == 0 {
                    self.fail_terminal(
                        account,
                        FailureKind::InvalidCode {
                            remaining_attempts: 0,
                        },
                    )
                } else {
                    self.fail(
                        account,
                        FailureKind::InvalidCode {
                            remaining_attempts: remaining,
                        },
                        true,
                        Some(attempt.pending_handle.clone()),
                    )
                }
            }
            other => self.fail_terminal(account, Self::terminal_kind(other)),
        }
    }

    /// Re-request a code after expiry, on a new connection after the backoff
    ///
    /// An expired code was never judged, so a rate-limited resend hands back
    /// the input the submission consumed.
    async fn resend_code(
        &self,
        account: AccountId,
        mut attempt: LoginAttempt,
        consumed_input: bool,
    ) -> LoginOutcome {
        if self.policy.resends_exhausted(attempt.resend_count) {
            return self.fail_terminal(
                account,
                FailureKind::CodeExpired {
                    remaining_resends: 0,
                },
            );
        }

        logger::info(
            LogTag::Auth,
            &format!(
                "Account {}: waiting {}s before requesting a new code",
                account,
                self.policy.resend_delay.as_secs()
            ),
        );
        tokio::time::sleep(self.policy.resend_delay).await;

        let handle = match self
            .request_code(&Self::attempt_params(&attempt), &attempt.phone)
            .await
        {
            Ok(handle) => handle,
            Err(RemoteError::RateLimited { seconds }) => {
                if consumed_input {
                    attempt.input_count = attempt.input_count.saturating_sub(1);
                    if let Err(e) = self.store.upsert_login_attempt(account, &attempt) {
                        return self.storage_failure(account, e);
                    }
                }
                return self.fail(
                    account,
                    FailureKind::RateLimited {
                        wait_seconds: seconds,
                    },
                    true,
                    Some(attempt.pending_handle.clone()),
                );
            }
            Err(e) => {
                return self.fail_terminal(
                    account,
                    FailureKind::TransientRemoteError {
                        description: e.to_string(),
                    },
                );
            }
        };

        let remaining = self.policy.remaining_resends_after(attempt.resend_count);
        attempt.reissue(handle.clone());
        if let Err(e) = self.store.upsert_login_attempt(account, &attempt) {
            return self.storage_failure(account, e);
        }

        logger::info(
            LogTag::Auth,
            &format!(
                "Account {}: new code sent (resend {}/{}, handle {})",
                account,
                attempt.resend_count,
                self.policy.max_code_resend_attempts,
                shorten_secret(&handle)
            ),
        );

        self.fail(
            account,
            FailureKind::CodeExpired {
                remaining_resends: remaining,
            },
            true,
            Some(handle),
        )
    }

    /// Persist the authorized connection and confirm it end to end
    async fn complete_login(
        &self,
        session: &mut dyn RemoteSession,
        account: AccountId,
    ) -> LoginOutcome {
        let token = match session.save_token().await {
            Ok(token) => token,
            Err(e) => {
                return self.fail_terminal(
                    account,
                    FailureKind::TransientRemoteError {
                        description: e.to_string(),
                    },
                )
            }
        };

        if let Err(e) = self.store.set_token(account, &token) {
            return self.storage_failure(account, e);
        }
        self.clear_attempt(account);

        let profile = match session.fetch_profile().await {
            Ok(profile) => {
                if let Err(e) = self
                    .store
                    .set_session(account, &session_with_profile(&token, &profile))
                {
                    logger::error(
                        LogTag::Store,
                        &format!("Account {}: failed to store profile fields: {}", account, e),
                    );
                }
                Some(profile)
            }
            Err(e) => {
                logger::warning(
                    LogTag::Session,
                    &format!(
                        "Account {}: logged in but profile check failed: {}",
                        account, e
                    ),
                );
                None
            }
        };

        logger::info(
            LogTag::Auth,
            &format!(
                "Account {}: logged in as {} (token {})",
                account,
                profile
                    .as_ref()
                    .map(RemoteProfile::summary)
                    .unwrap_or_else(|| "unknown profile".to_string()),
                shorten_secret(&token)
            ),
        );

        LoginOutcome::Success {
            token,
            profile,
            message: self.messages.success(),
        }
    }

    // =========================================================================
    // STORED TOKENS
    // =========================================================================

    /// Log in with a previously issued token and refresh the stored profile
    pub async fn login_with_stored_token(
        &self,
        account: AccountId,
        token: &str,
        proxy: Option<ProxyConfig>,
    ) -> LoginOutcome {
        let Some(_guard) = self.locks.try_acquire(account) else {
            return self.in_progress(account);
        };

        let proxy = self.effective_proxy(proxy);
        match self.validator.validate(token, proxy.as_ref()).await {
            Ok(profile) => {
                if let Err(e) = self
                    .store
                    .set_session(account, &session_with_profile(token, &profile))
                {
                    return self.storage_failure(account, e);
                }
                logger::info(
                    LogTag::Session,
                    &format!(
                        "Account {}: stored token accepted for {}",
                        account,
                        profile.summary()
                    ),
                );
                LoginOutcome::Success {
                    token: token.to_string(),
                    profile: Some(profile),
                    message: self.messages.success(),
                }
            }
            Err(ValidationError::Unauthorized) => {
                self.fail(account, FailureKind::SessionUnauthorized, false, None)
            }
            Err(ValidationError::Remote(RemoteError::RateLimited { seconds })) => self.fail(
                account,
                FailureKind::RateLimited {
                    wait_seconds: seconds,
                },
                true,
                None,
            ),
            Err(ValidationError::Remote(e)) => self.fail(
                account,
                FailureKind::TransientRemoteError {
                    description: e.to_string(),
                },
                false,
                None,
            ),
        }
    }

    /// Read-only probe of a token, the store is not touched
    pub async fn check_token_validity(
        &self,
        token: &str,
        proxy: Option<ProxyConfig>,
    ) -> TokenStatus {
        let proxy = self.effective_proxy(proxy);
        self.validator.probe(token, proxy.as_ref()).await
    }

    // =========================================================================
    // ATTEMPT AND SESSION ADMIN
    // =========================================================================

    /// Drop the pending attempt, returns whether one existed
    pub fn cancel(&self, account: AccountId) -> Result<bool, LoginFailure> {
        let _guard = self.guard_or_failure(account)?;
        let existed = self
            .store
            .clear_login_attempt(account)
            .map_err(|e| self.storage_failure_value(e))?;

        if existed {
            logger::info(LogTag::Auth, &format!("Account {}: login cancelled", account));
        }
        Ok(existed)
    }

    /// Forget the stored session, returns whether one existed
    pub fn logout(&self, account: AccountId) -> Result<bool, LoginFailure> {
        let _guard = self.guard_or_failure(account)?;
        let existed = self
            .store
            .clear_token(account)
            .map_err(|e| self.storage_failure_value(e))?;

        if existed {
            logger::info(LogTag::Session, &format!("Account {}: logged out", account));
        }
        Ok(existed)
    }

    pub fn stored_session(&self, account: AccountId) -> Result<Option<SessionRecord>, LoginFailure> {
        self.store
            .get_session(account)
            .map_err(|e| self.storage_failure_value(e))
    }

    /// Whether a stored session would be replaced by a new login
    pub fn has_session(&self, account: AccountId) -> Result<bool, LoginFailure> {
        Ok(self.stored_session(account)?.is_some())
    }

    pub fn state(&self, account: AccountId) -> Result<LoginState, LoginFailure> {
        let attempt = self
            .store
            .get_login_attempt(account)
            .map_err(|e| self.storage_failure_value(e))?;
        Ok(LoginState::from_attempt(attempt.as_ref()))
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn attempt_params(attempt: &LoginAttempt) -> ConnectParams {
        ConnectParams {
            api_id: attempt.api_id,
            api_hash: attempt.api_hash.clone(),
            proxy: attempt.proxy.clone(),
            token: None,
        }
    }

    /// Open a connection, request a code, close
    async fn request_code(&self, params: &ConnectParams, phone: &str) -> Result<String, RemoteError> {
        let mut session = self.connector.connect(params).await?;
        let result = session.request_code(phone).await;
        session.disconnect().await;
        result
    }

    fn terminal_kind(error: RemoteError) -> FailureKind {
        match error {
            RemoteError::InvalidPhoneNumber => FailureKind::InvalidPhoneNumber,
            RemoteError::PhoneBanned => FailureKind::PhoneBanned,
            other => FailureKind::TransientRemoteError {
                description: other.to_string(),
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn lock_for_tests(&self, account: AccountId) -> AccountGuard {
        self.locks
            .try_acquire(account)
            .expect("account lock already held")
    }

    fn guard_or_failure(&self, account: AccountId) -> Result<AccountGuard, LoginFailure> {
        self.locks.try_acquire(account).ok_or_else(|| {
            self.failure_value(account, FailureKind::VerificationInProgress, true, None)
        })
    }

    fn clear_attempt(&self, account: AccountId) {
        if let Err(e) = self.store.clear_login_attempt(account) {
            logger::error(
                LogTag::Store,
                &format!("Account {}: failed to clear login attempt: {}", account, e),
            );
        }
    }

    fn failure_value(
        &self,
        account: AccountId,
        kind: FailureKind,
        retryable: bool,
        pending_handle: Option<String>,
    ) -> LoginFailure {
        if retryable {
            logger::warning(LogTag::Auth, &format!("Account {}: {}", account, kind));
        } else {
            logger::error(
                LogTag::Auth,
                &format!("Account {}: {} (terminal)", account, kind),
            );
        }

        LoginFailure {
            message: self.messages.failure(&kind, retryable),
            kind,
            retryable,
            pending_handle,
        }
    }

    fn fail(
        &self,
        account: AccountId,
        kind: FailureKind,
        retryable: bool,
        pending_handle: Option<String>,
    ) -> LoginOutcome {
        LoginOutcome::Failure(self.failure_value(account, kind, retryable, pending_handle))
    }

    /// Terminal failure: the attempt is gone afterwards
    fn fail_terminal(&self, account: AccountId, kind: FailureKind) -> LoginOutcome {
        self.clear_attempt(account);
        self.fail(account, kind, false, None)
    }

    fn malformed(&self, account: AccountId, attempt: &LoginAttempt) -> LoginOutcome {
        self.fail(
            account,
            FailureKind::MalformedCode,
            true,
            Some(attempt.pending_handle.clone()),
        )
    }

    fn in_progress(&self, account: AccountId) -> LoginOutcome {
        self.fail(account, FailureKind::VerificationInProgress, true, None)
    }

    fn storage_failure_value(&self, error: StoreError) -> LoginFailure {
        let kind = FailureKind::StorageFailure {
            description: error.to_string(),
        };
        LoginFailure {
            message: self.messages.failure(&kind, false),
            kind,
            retryable: false,
            pending_handle: None,
        }
    }

    fn storage_failure(&self, account: AccountId, error: StoreError) -> LoginOutcome {
        logger::error(
            LogTag::Store,
            &format!(
                "Account {}: credential store failed{}: {}",
                account,
                if error.is_recoverable() { " (transient)" } else { "" },
                error
            ),
        );
        self.clear_attempt(account);
        LoginOutcome::Failure(self.storage_failure_value(error))
    }
}

/// Parse the `[telegram] proxy` descriptor, empty means direct
pub(crate) fn default_proxy_from(descriptor: &str) -> Result<Option<ProxyConfig>, ConfigError> {
    ProxyConfig::parse_optional(descriptor).map_err(|e| ConfigError::InvalidField {
        field: "telegram.proxy".to_string(),
        reason: e.to_string(),
    })
}
