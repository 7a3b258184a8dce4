//! Scripted remote client for tests
//!
//! Every connection and every remote call is recorded. Results are taken from
//! per-operation queues and fall back to success when a queue is empty.

use super::client::{ConnectParams, RemoteProfile, RemoteSession, SessionConnector};
use crate::errors::RemoteError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect(ConnectParams),
    RequestCode { phone: String },
    VerifyCode { phone: String, code: String, handle: String },
    VerifyPassword { password: String },
    IsAuthorized,
    FetchProfile,
    SaveToken,
    Disconnect,
}

pub fn sample_profile() -> RemoteProfile {
    RemoteProfile {
        id: 424242,
        first_name: "Ada".to_string(),
        last_name: Some("Lovelace".to_string()),
        username: Some("ada".to_string()),
    }
}

struct Script {
    calls: Vec<Call>,
    open: usize,
    max_open: usize,
    issued_handles: usize,
    connect: VecDeque<RemoteError>,
    request_code: VecDeque<Result<String, RemoteError>>,
    verify_code: VecDeque<Result<(), RemoteError>>,
    verify_password: VecDeque<Result<(), RemoteError>>,
    authorized: Result<bool, RemoteError>,
    profile: Result<RemoteProfile, RemoteError>,
    token: String,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            open: 0,
            max_open: 0,
            issued_handles: 0,
            connect: VecDeque::new(),
            request_code: VecDeque::new(),
            verify_code: VecDeque::new(),
            verify_password: VecDeque::new(),
            authorized: Ok(true),
            profile: Ok(sample_profile()),
            token: "token-after-login".to_string(),
        }
    }
}

#[derive(Clone, Default)]
pub struct ScriptedConnector {
    script: Arc<Mutex<Script>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Scripting
    // -------------------------------------------------------------------------

    pub fn fail_next_connect(&self, error: RemoteError) {
        self.script.lock().connect.push_back(error);
    }

    pub fn push_request_code(&self, result: Result<String, RemoteError>) {
        self.script.lock().request_code.push_back(result);
    }

    pub fn push_verify_code(&self, result: Result<(), RemoteError>) {
        self.script.lock().verify_code.push_back(result);
    }

    pub fn push_verify_password(&self, result: Result<(), RemoteError>) {
        self.script.lock().verify_password.push_back(result);
    }

    pub fn set_authorized(&self, result: Result<bool, RemoteError>) {
        self.script.lock().authorized = result;
    }

    pub fn set_profile(&self, result: Result<RemoteProfile, RemoteError>) {
        self.script.lock().profile = result;
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.script.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn connections(&self) -> usize {
        self.count(|c| matches!(c, Call::Connect(_)))
    }

    pub fn disconnects(&self) -> usize {
        self.count(|c| matches!(c, Call::Disconnect))
    }

    pub fn open_now(&self) -> usize {
        self.script.lock().open
    }

    /// Highest number of connections that were open at the same time
    pub fn max_open(&self) -> usize {
        self.script.lock().max_open
    }

    /// Codes exactly as the remote received them
    pub fn verified_codes(&self) -> Vec<String> {
        self.script
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::VerifyCode { code, .. } => Some(code.clone()),
                _ => None,
            })
            .collect()
    }

    /// Handles the verifications were made against
    pub fn verified_handles(&self) -> Vec<String> {
        self.script
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::VerifyCode { handle, .. } => Some(handle.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SessionConnector for ScriptedConnector {
    async fn connect(&self, params: &ConnectParams) -> Result<Box<dyn RemoteSession>, RemoteError> {
        let mut script = self.script.lock();
        script.calls.push(Call::Connect(params.clone()));
        if let Some(error) = script.connect.pop_front() {
            return Err(error);
        }
        script.open += 1;
        script.max_open = script.max_open.max(script.open);

        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
            closed: false,
        }))
    }
}

struct ScriptedSession {
    script: Arc<Mutex<Script>>,
    closed: bool,
}

#[async_trait]
impl RemoteSession for ScriptedSession {
    async fn request_code(&mut self, phone: &str) -> Result<String, RemoteError> {
        let mut script = self.script.lock();
        script.calls.push(Call::RequestCode {
            phone: phone.to_string(),
        });
        match script.request_code.pop_front() {
            Some(result) => result,
            None => {
                script.issued_handles += 1;
                Ok(format!("handle-{}", script.issued_handles))
            }
        }
    }

    async fn verify_code(
        &mut self,
        phone: &str,
        code: &str,
        handle: &str,
    ) -> Result<(), RemoteError> {
        let mut script = self.script.lock();
        script.calls.push(Call::VerifyCode {
            phone: phone.to_string(),
            code: code.to_string(),
            handle: handle.to_string(),
        });
        script.verify_code.pop_front().unwrap_or(Ok(()))
    }

    async fn verify_password(&mut self, password: &str) -> Result<(), RemoteError> {
        let mut script = self.script.lock();
        script.calls.push(Call::VerifyPassword {
            password: password.to_string(),
        });
        script.verify_password.pop_front().unwrap_or(Ok(()))
    }

    async fn is_authorized(&mut self) -> Result<bool, RemoteError> {
        let mut script = self.script.lock();
        script.calls.push(Call::IsAuthorized);
        script.authorized.clone()
    }

    async fn fetch_profile(&mut self) -> Result<RemoteProfile, RemoteError> {
        let mut script = self.script.lock();
        script.calls.push(Call::FetchProfile);
        script.profile.clone()
    }

    async fn save_token(&mut self) -> Result<String, RemoteError> {
        let mut script = self.script.lock();
        script.calls.push(Call::SaveToken);
        Ok(script.token.clone())
    }

    async fn disconnect(&mut self) {
        let mut script = self.script.lock();
        script.calls.push(Call::Disconnect);
        assert!(!self.closed, "connection closed twice");
        self.closed = true;
        script.open -= 1;
    }
}
