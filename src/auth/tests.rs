//! Login flow tests against the scripted remote client

use super::testing::{sample_profile, Call, ScriptedConnector};
use super::*;
use crate::errors::RemoteError;
use crate::proxy::ProxyConfig;
use crate::store::{CredentialStore, LoginAttempt, SqliteCredentialStore};
use std::sync::Arc;
use std::time::Duration;

const ACCOUNT: i64 = 1;
const PHONE: &str = "+15550001";

struct Harness {
    connector: ScriptedConnector,
    store: Arc<SqliteCredentialStore>,
    orchestrator: LoginOrchestrator,
}

fn harness() -> Harness {
    let connector = ScriptedConnector::new();
    let store = Arc::new(SqliteCredentialStore::open_in_memory().unwrap());
    let policy = LoginPolicy::default();
    let messages = Messages::new(Locale::English, "/login", policy.code_length);
    let orchestrator = LoginOrchestrator::new(
        Arc::new(connector.clone()),
        store.clone(),
        policy,
        messages,
        AppCredentials::new(777, "process-hash"),
    );
    Harness {
        connector,
        store,
        orchestrator,
    }
}

fn app() -> AppCredentials {
    AppCredentials::new(123, "user-hash")
}

impl Harness {
    async fn started(self) -> Self {
        let outcome = self.orchestrator.start(ACCOUNT, &app(), PHONE, None).await;
        assert!(matches!(outcome, LoginOutcome::CodeSent { .. }), "{:?}", outcome);
        self
    }

    fn attempt(&self) -> Option<LoginAttempt> {
        self.store.get_login_attempt(ACCOUNT).unwrap()
    }

    fn assert_all_closed(&self) {
        assert_eq!(self.connector.open_now(), 0);
        assert_eq!(self.connector.connections(), self.connector.disconnects());
        assert!(self.connector.max_open() <= 1);
    }
}

fn failure(outcome: &LoginOutcome) -> &LoginFailure {
    outcome
        .failure()
        .unwrap_or_else(|| panic!("expected failure, got {:?}", outcome))
}

// =============================================================================
// START
// =============================================================================

#[tokio::test]
async fn test_start_persists_fresh_attempt() {
    let h = harness();
    let proxy = ProxyConfig::parse("socks5:1.2.3.4:1080:user:pass").unwrap();
    let outcome = h
        .orchestrator
        .start(ACCOUNT, &app(), PHONE, Some(proxy.clone()))
        .await;

    match &outcome {
        LoginOutcome::CodeSent {
            pending_handle,
            message,
        } => {
            assert_eq!(pending_handle, "handle-1");
            assert!(message.contains("1 2 3 4 5"));
        }
        other => panic!("unexpected {:?}", other),
    }

    let attempt = h.attempt().unwrap();
    assert_eq!(attempt.phone, PHONE);
    assert_eq!(attempt.api_id, 123);
    assert_eq!(attempt.proxy, Some(proxy.clone()));
    assert_eq!((attempt.input_count, attempt.resend_count), (0, 0));

    match &h.connector.calls()[0] {
        Call::Connect(params) => {
            assert_eq!(params.api_hash, "user-hash");
            assert_eq!(params.proxy, Some(proxy));
            assert_eq!(params.token, None);
        }
        other => panic!("unexpected first call {:?}", other),
    }
    assert_eq!(h.orchestrator.state(ACCOUNT).unwrap(), LoginState::CodeSent);
    h.assert_all_closed();
}

#[tokio::test]
async fn test_start_rejects_bad_phone_without_remote_call() {
    let h = harness();
    let outcome = h.orchestrator.start(ACCOUNT, &app(), "5550001", None).await;

    let failure = failure(&outcome);
    assert_eq!(failure.kind, FailureKind::InvalidPhoneNumber);
    assert!(!failure.retryable);
    assert_eq!(h.connector.connections(), 0);
}

#[tokio::test]
async fn test_start_rate_limited_persists_nothing() {
    let h = harness();
    h.connector
        .push_request_code(Err(RemoteError::RateLimited { seconds: 45 }));

    let outcome = h.orchestrator.start(ACCOUNT, &app(), PHONE, None).await;
    let failure = failure(&outcome);
    assert_eq!(failure.kind, FailureKind::RateLimited { wait_seconds: 45 });
    assert!(failure.message.contains("45"));
    assert!(h.attempt().is_none());
    h.assert_all_closed();
}

#[tokio::test]
async fn test_start_banned_phone_is_terminal() {
    let h = harness();
    h.connector.push_request_code(Err(RemoteError::PhoneBanned));

    let outcome = h.orchestrator.start(ACCOUNT, &app(), PHONE, None).await;
    let failure = failure(&outcome);
    assert_eq!(failure.kind, FailureKind::PhoneBanned);
    assert!(failure.message.contains("/login"));
    assert!(h.attempt().is_none());
}

// =============================================================================
// SUBMIT: PRECONDITIONS AND NORMALIZATION
// =============================================================================

#[tokio::test]
async fn test_submit_without_start_makes_no_remote_call() {
    let h = harness();
    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;

    let failure = failure(&outcome);
    assert_eq!(failure.kind, FailureKind::NoPendingAttempt);
    assert!(!failure.retryable);
    assert!(h.connector.calls().is_empty());
}

#[tokio::test]
async fn test_code_separators_are_stripped() {
    let h = harness().started().await;
    h.connector.push_verify_code(Err(RemoteError::InvalidCode));
    h.connector.push_verify_code(Err(RemoteError::InvalidCode));

    for raw in ["1 2 3 4 5", "12345", "1-2-3-4-5"] {
        h.orchestrator.submit(ACCOUNT, Some(raw), None).await;
    }

    assert_eq!(h.connector.verified_codes(), vec!["12345"; 3]);
}

#[tokio::test]
async fn test_malformed_code_consumes_nothing() {
    let h = harness().started().await;
    let before = h.connector.calls().len();

    let outcome = h.orchestrator.submit(ACCOUNT, Some("1 2 3 4"), None).await;
    let failure = failure(&outcome);
    assert_eq!(failure.kind, FailureKind::MalformedCode);
    assert!(failure.retryable);
    assert_eq!(failure.pending_handle.as_deref(), Some("handle-1"));

    assert_eq!(h.connector.calls().len(), before);
    assert_eq!(h.attempt().unwrap().input_count, 0);
}

#[tokio::test]
async fn test_password_only_outside_two_factor_is_malformed() {
    let h = harness().started().await;
    let outcome = h.orchestrator.submit(ACCOUNT, None, Some("secret")).await;
    assert_eq!(outcome.failure_kind(), Some(&FailureKind::MalformedCode));
    assert!(h.attempt().is_some());
}

// =============================================================================
// SUBMIT: LIMITS
// =============================================================================

#[tokio::test]
async fn test_invalid_code_budget_then_terminal_without_remote_call() {
    let h = harness().started().await;
    for _ in 0..3 {
        h.connector.push_verify_code(Err(RemoteError::InvalidCode));
    }

    let first = h.orchestrator.submit(ACCOUNT, Some("11111"), None).await;
    assert_eq!(
        failure(&first).kind,
        FailureKind::InvalidCode {
            remaining_attempts: 2
        }
    );
    assert!(failure(&first).retryable);
    assert!(failure(&first).message.contains("2 attempts left"));

    let second = h.orchestrator.submit(ACCOUNT, Some("22222"), None).await;
    assert_eq!(
        failure(&second).kind,
        FailureKind::InvalidCode {
            remaining_attempts: 1
        }
    );

    let third = h.orchestrator.submit(ACCOUNT, Some("33333"), None).await;
    assert_eq!(
        failure(&third).kind,
        FailureKind::InvalidCode {
            remaining_attempts: 0
        }
    );
    assert!(!failure(&third).retryable);
    assert!(h.attempt().is_none());

    let fourth = h.orchestrator.submit(ACCOUNT, Some("44444"), None).await;
    assert!(!failure(&fourth).retryable);
    assert!(failure(&fourth).message.contains("/login"));
    assert_eq!(h.connector.verified_codes().len(), 3);
    h.assert_all_closed();
}

#[tokio::test]
async fn test_exhausted_inputs_terminate_before_remote_call() {
    let h = harness().started().await;
    let mut attempt = h.attempt().unwrap();
    attempt.input_count = 3;
    h.store.upsert_login_attempt(ACCOUNT, &attempt).unwrap();
    let before = h.connector.connections();

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    assert_eq!(
        failure(&outcome).kind,
        FailureKind::InvalidCode {
            remaining_attempts: 0
        }
    );
    assert_eq!(h.connector.connections(), before);
    assert!(h.attempt().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_code_expiry_resends_then_terminal() {
    let h = harness().started().await;
    for _ in 0..4 {
        h.connector.push_verify_code(Err(RemoteError::CodeExpired));
    }

    for expected_remaining in [2, 1, 0] {
        let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
        let failure = failure(&outcome);
        assert_eq!(
            failure.kind,
            FailureKind::CodeExpired {
                remaining_resends: expected_remaining
            }
        );
        assert!(failure.retryable);
        assert_eq!(h.attempt().unwrap().resend_count, 3 - expected_remaining);
    }

    let requests_before = h.connector.count(|c| matches!(c, Call::RequestCode { .. }));
    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    let failure = failure(&outcome);
    assert_eq!(
        failure.kind,
        FailureKind::CodeExpired {
            remaining_resends: 0
        }
    );
    assert!(!failure.retryable);
    assert!(failure.message.contains("/login"));
    assert!(h.attempt().is_none());
    assert_eq!(
        h.connector.count(|c| matches!(c, Call::RequestCode { .. })),
        requests_before
    );
    h.assert_all_closed();
}

#[tokio::test(start_paused = true)]
async fn test_expiry_closes_stale_connection_before_reconnecting() {
    let h = harness().started().await;
    h.connector.push_verify_code(Err(RemoteError::CodeExpired));

    let begin = tokio::time::Instant::now();
    h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    assert!(begin.elapsed() >= Duration::from_secs(30));

    let calls = h.connector.calls();
    let verify = calls
        .iter()
        .position(|c| matches!(c, Call::VerifyCode { .. }))
        .unwrap();
    let close = verify + calls[verify..]
        .iter()
        .position(|c| matches!(c, Call::Disconnect))
        .unwrap();
    let reopen = verify + calls[verify..]
        .iter()
        .position(|c| matches!(c, Call::Connect(_)))
        .unwrap();
    assert!(close < reopen);
    assert_eq!(h.connector.max_open(), 1);
    h.assert_all_closed();
}

#[tokio::test]
async fn test_rate_limit_leaves_counters_untouched() {
    let h = harness().started().await;
    h.connector
        .push_verify_code(Err(RemoteError::RateLimited { seconds: 60 }));

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    let failure = failure(&outcome);
    assert_eq!(failure.kind, FailureKind::RateLimited { wait_seconds: 60 });
    assert!(failure.retryable);

    let attempt = h.attempt().unwrap();
    assert_eq!((attempt.input_count, attempt.resend_count), (0, 0));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_on_resend_preserves_state() {
    let h = harness().started().await;
    h.connector.push_verify_code(Err(RemoteError::CodeExpired));
    h.connector
        .push_request_code(Err(RemoteError::RateLimited { seconds: 90 }));

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    assert_eq!(
        failure(&outcome).kind,
        FailureKind::RateLimited { wait_seconds: 90 }
    );

    let attempt = h.attempt().unwrap();
    assert_eq!(attempt.resend_count, 0);
    assert_eq!(attempt.pending_handle, "handle-1");
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_resends_do_not_spend_inputs() {
    let h = harness().started().await;
    for _ in 0..3 {
        h.connector.push_verify_code(Err(RemoteError::CodeExpired));
        h.connector
            .push_request_code(Err(RemoteError::RateLimited { seconds: 5 }));

        let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
        let failure = failure(&outcome);
        assert_eq!(failure.kind, FailureKind::RateLimited { wait_seconds: 5 });
        assert!(failure.retryable);

        let attempt = h.attempt().unwrap();
        assert_eq!((attempt.input_count, attempt.resend_count), (0, 0));
    }

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    assert!(outcome.is_success(), "{:?}", outcome);
    h.assert_all_closed();
}

#[tokio::test(start_paused = true)]
async fn test_resend_failure_is_terminal() {
    let h = harness().started().await;
    h.connector.push_verify_code(Err(RemoteError::CodeExpired));
    h.connector
        .push_request_code(Err(RemoteError::Connection("reset".to_string())));

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    let failure = failure(&outcome);
    assert!(matches!(
        failure.kind,
        FailureKind::TransientRemoteError { .. }
    ));
    assert!(!failure.retryable);
    assert!(h.attempt().is_none());
}

#[tokio::test]
async fn test_unexpected_remote_error_clears_attempt() {
    let h = harness().started().await;
    h.connector
        .push_verify_code(Err(RemoteError::Other("internal".to_string())));

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    match &failure(&outcome).kind {
        FailureKind::TransientRemoteError { description } => {
            assert!(description.contains("internal"))
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(h.attempt().is_none());
    h.assert_all_closed();
}

// =============================================================================
// END-TO-END SCENARIOS
// =============================================================================

#[tokio::test]
async fn test_scenario_happy_path() {
    let h = harness().started().await;
    h.connector.set_profile(Ok(RemoteProfile {
        id: 42,
        first_name: "Ali".to_string(),
        last_name: None,
        username: None,
    }));

    let outcome = h.orchestrator.submit(ACCOUNT, Some("1 2 3 4 5"), None).await;
    match &outcome {
        LoginOutcome::Success {
            token,
            profile,
            message,
        } => {
            assert_eq!(token, "token-after-login");
            assert_eq!(message, "✅ Logged in successfully!");
            assert_eq!(profile.as_ref().unwrap().id, 42);
        }
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(
        h.store.get_token(ACCOUNT).unwrap().as_deref(),
        Some("token-after-login")
    );
    let record = h.orchestrator.stored_session(ACCOUNT).unwrap().unwrap();
    assert_eq!(record.user_id, Some(42));
    assert_eq!(record.first_name.as_deref(), Some("Ali"));
    assert!(h.attempt().is_none());
    assert_eq!(h.orchestrator.state(ACCOUNT).unwrap(), LoginState::Idle);
    assert_eq!(h.connector.verified_handles(), vec!["handle-1"]);
    h.assert_all_closed();
}

#[tokio::test]
async fn test_scenario_profile_failure_keeps_token() {
    let h = harness().started().await;
    h.connector
        .set_profile(Err(RemoteError::Connection("timeout".to_string())));

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    assert_eq!(
        outcome,
        LoginOutcome::Success {
            token: "token-after-login".to_string(),
            profile: None,
            message: h.orchestrator.messages().success(),
        }
    );
    assert!(h.orchestrator.has_session(ACCOUNT).unwrap());
    h.assert_all_closed();
}

#[tokio::test(start_paused = true)]
async fn test_scenario_expired_code_then_success_with_new_handle() {
    let h = harness().started().await;
    h.connector.push_verify_code(Err(RemoteError::CodeExpired));

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    let failure = failure(&outcome);
    assert_eq!(
        failure.kind,
        FailureKind::CodeExpired {
            remaining_resends: 2
        }
    );
    assert!(failure.message.contains("2 code resends left"));
    assert_eq!(failure.pending_handle.as_deref(), Some("handle-2"));

    let attempt = h.attempt().unwrap();
    assert_eq!(attempt.pending_handle, "handle-2");
    assert_eq!((attempt.input_count, attempt.resend_count), (0, 1));

    let outcome = h.orchestrator.submit(ACCOUNT, Some("54321"), None).await;
    assert!(outcome.is_success());
    assert_eq!(h.connector.verified_handles(), vec!["handle-1", "handle-2"]);
}

#[tokio::test]
async fn test_scenario_two_factor_password() {
    let h = harness().started().await;
    h.connector
        .push_verify_code(Err(RemoteError::PasswordRequired));

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    let failure = failure(&outcome);
    assert_eq!(failure.kind, FailureKind::PasswordRequired);
    assert!(failure.retryable);

    let attempt = h.attempt().unwrap();
    assert!(attempt.two_factor_required);
    assert_eq!(attempt.input_count, 1);
    assert_eq!(
        h.orchestrator.state(ACCOUNT).unwrap(),
        LoginState::AwaitingPassword
    );

    // Fresh connection: the accepted code is replayed before the password
    h.connector
        .push_verify_code(Err(RemoteError::PasswordRequired));
    let outcome = h.orchestrator.submit(ACCOUNT, None, Some("secret")).await;
    assert!(outcome.is_success(), "{:?}", outcome);

    assert_eq!(h.connector.verified_codes(), vec!["12345", "12345"]);
    assert_eq!(
        h.connector.count(|c| matches!(
            c,
            Call::VerifyPassword { password } if password == "secret"
        )),
        1
    );
    assert!(h.attempt().is_none());
    assert!(h.orchestrator.has_session(ACCOUNT).unwrap());
    h.assert_all_closed();
}

#[tokio::test]
async fn test_wrong_password_keeps_attempt_open() {
    let h = harness().started().await;
    h.connector
        .push_verify_code(Err(RemoteError::PasswordRequired));
    h.connector
        .push_verify_password(Err(RemoteError::PasswordInvalid));

    let outcome = h
        .orchestrator
        .submit(ACCOUNT, Some("12345"), Some("wrong"))
        .await;
    let failure = failure(&outcome);
    assert_eq!(failure.kind, FailureKind::PasswordInvalid);
    assert!(failure.retryable);
    assert!(failure.message.contains("code does not need to be repeated"));

    let attempt = h.attempt().unwrap();
    assert!(attempt.two_factor_required);
    assert_eq!(attempt.accepted_code.as_deref(), Some("12345"));

    // Password retries do not spend code inputs
    for _ in 0..4 {
        h.connector
            .push_verify_code(Err(RemoteError::PasswordRequired));
        h.connector
            .push_verify_password(Err(RemoteError::PasswordInvalid));
        h.orchestrator.submit(ACCOUNT, None, Some("still-wrong")).await;
    }
    assert_eq!(h.attempt().unwrap().input_count, 1);

    h.connector
        .push_verify_code(Err(RemoteError::PasswordRequired));
    let outcome = h.orchestrator.submit(ACCOUNT, None, Some("right")).await;
    assert!(outcome.is_success());
}

// =============================================================================
// CONCURRENCY, STORED TOKENS, ADMIN
// =============================================================================

#[tokio::test]
async fn test_concurrent_operation_rejected() {
    let h = harness().started().await;
    let before = h.connector.connections();
    let _held = h.orchestrator.lock_for_tests(ACCOUNT);

    let outcome = h.orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    let failure = failure(&outcome);
    assert_eq!(failure.kind, FailureKind::VerificationInProgress);
    assert!(failure.retryable);
    assert_eq!(h.connector.connections(), before);
    assert!(h.orchestrator.cancel(ACCOUNT).is_err());

    // Other accounts are unaffected
    let other = h.orchestrator.start(2, &app(), PHONE, None).await;
    assert!(matches!(other, LoginOutcome::CodeSent { .. }));
}

#[tokio::test]
async fn test_stored_token_login_updates_profile() {
    let h = harness();
    let outcome = h
        .orchestrator
        .login_with_stored_token(ACCOUNT, "old-token", None)
        .await;
    assert!(outcome.is_success());

    match &h.connector.calls()[0] {
        Call::Connect(params) => {
            assert_eq!(params.api_id, 777);
            assert_eq!(params.token.as_deref(), Some("old-token"));
        }
        other => panic!("unexpected first call {:?}", other),
    }
    let record = h.store.get_session(ACCOUNT).unwrap().unwrap();
    assert_eq!(record.token, "old-token");
    assert_eq!(record.user_id, Some(sample_profile().id));
}

#[tokio::test]
async fn test_stored_token_unauthorized_leaves_store_alone() {
    let h = harness();
    h.store.set_token(ACCOUNT, "previous").unwrap();
    h.connector.set_authorized(Ok(false));

    let outcome = h
        .orchestrator
        .login_with_stored_token(ACCOUNT, "stale", None)
        .await;
    assert_eq!(
        outcome.failure_kind(),
        Some(&FailureKind::SessionUnauthorized)
    );
    assert_eq!(
        h.store.get_token(ACCOUNT).unwrap().as_deref(),
        Some("previous")
    );
    h.assert_all_closed();
}

#[tokio::test]
async fn test_default_proxy_used_when_none_given() {
    let relay = ProxyConfig::parse("http:10.0.0.1:3128").unwrap();
    let explicit = ProxyConfig::parse("socks5:1.2.3.4:1080").unwrap();
    let mut h = harness();
    h.orchestrator = h.orchestrator.with_default_proxy(Some(relay.clone()));

    h.orchestrator.start(ACCOUNT, &app(), PHONE, None).await;
    assert_eq!(h.attempt().unwrap().proxy, Some(relay.clone()));

    h.orchestrator.check_token_validity("tok", None).await;
    h.orchestrator
        .login_with_stored_token(2, "tok", Some(explicit.clone()))
        .await;

    let proxies: Vec<Option<ProxyConfig>> = h
        .connector
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Connect(params) => Some(params.proxy),
            _ => None,
        })
        .collect();
    assert_eq!(proxies, vec![Some(relay.clone()), Some(relay), Some(explicit)]);
}

#[test]
fn test_default_proxy_descriptor_from_config() {
    use super::orchestrator::default_proxy_from;
    use crate::errors::ConfigError;

    assert_eq!(default_proxy_from("").unwrap(), None);
    assert_eq!(
        default_proxy_from("socks5:1.2.3.4:1080").unwrap().map(|p| p.port),
        Some(1080)
    );
    assert!(matches!(
        default_proxy_from("ftp:1.2.3.4:21"),
        Err(ConfigError::InvalidField { .. })
    ));
}

#[tokio::test]
async fn test_check_token_validity_is_read_only() {
    let h = harness();
    let status = h.orchestrator.check_token_validity("tok", None).await;
    assert_eq!(status, TokenStatus::Valid(sample_profile()));
    assert!(h
        .orchestrator
        .messages()
        .token_status(&status)
        .contains("Ada Lovelace (@ada)"));
    assert!(h.store.list_accounts().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_and_logout() {
    let h = harness().started().await;
    assert!(h.orchestrator.cancel(ACCOUNT).unwrap());
    assert!(!h.orchestrator.cancel(ACCOUNT).unwrap());
    assert_eq!(h.orchestrator.state(ACCOUNT).unwrap(), LoginState::Idle);

    h.store.set_token(ACCOUNT, "tok").unwrap();
    assert!(h.orchestrator.logout(ACCOUNT).unwrap());
    assert!(!h.orchestrator.has_session(ACCOUNT).unwrap());
}

#[tokio::test]
async fn test_arabic_messages() {
    let connector = ScriptedConnector::new();
    let store = Arc::new(SqliteCredentialStore::open_in_memory().unwrap());
    let orchestrator = LoginOrchestrator::new(
        Arc::new(connector),
        store,
        LoginPolicy::default(),
        Messages::new(Locale::Arabic, "/login", 5),
        AppCredentials::new(1, "h"),
    );

    let outcome = orchestrator.submit(ACCOUNT, Some("12345"), None).await;
    let failure = failure(&outcome);
    assert!(failure.message.contains("لا توجد عملية تسجيل دخول جارية"));
    assert!(failure.message.contains("/login"));
}
