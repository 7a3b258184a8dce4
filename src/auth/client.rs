/// Remote session client seam
///
/// The account provider's protocol lives behind these two traits. A
/// `SessionConnector` opens connections; the returned `RemoteSession` is the
/// open handle and must be closed with `disconnect` by whoever opened it.
use crate::errors::RemoteError;
use crate::proxy::ProxyConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Everything needed to open one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub api_id: i32,
    pub api_hash: String,
    pub proxy: Option<ProxyConfig>,
    /// Reconnect token; `None` opens a fresh, unauthorized connection
    pub token: Option<String>,
}

/// Profile of the account a session is authorized for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl RemoteProfile {
    /// "First Last (@username)"
    pub fn summary(&self) -> String {
        let mut name = self.first_name.clone();
        if let Some(last) = self.last_name.as_deref().filter(|l| !l.is_empty()) {
            name.push(' ');
            name.push_str(last);
        }
        match self.username.as_deref().filter(|u| !u.is_empty()) {
            Some(username) => format!("{} (@{})", name, username),
            None => name,
        }
    }
}

/// An open connection to the account provider
#[async_trait]
pub trait RemoteSession: Send {
    /// Ask the provider to send a code, returns the pending verification handle
    async fn request_code(&mut self, phone: &str) -> Result<String, RemoteError>;

    /// `Ok` means the connection is now authorized
    async fn verify_code(&mut self, phone: &str, code: &str, handle: &str)
        -> Result<(), RemoteError>;

    async fn verify_password(&mut self, password: &str) -> Result<(), RemoteError>;

    async fn is_authorized(&mut self) -> Result<bool, RemoteError>;

    async fn fetch_profile(&mut self) -> Result<RemoteProfile, RemoteError>;

    /// Serialize the connection state into an opaque reconnect token
    async fn save_token(&mut self) -> Result<String, RemoteError>;

    async fn disconnect(&mut self);
}

#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(&self, params: &ConnectParams) -> Result<Box<dyn RemoteSession>, RemoteError>;
}
