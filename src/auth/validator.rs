/// Stored-token validation
///
/// Reconnects with a token, confirms the connection is authorized and reads
/// the profile. No side effects beyond opening and closing one connection.
use super::client::{ConnectParams, RemoteProfile, RemoteSession, SessionConnector};
use super::messages::shorten_secret;
use super::types::{AppCredentials, TokenStatus};
use crate::errors::{RemoteError, ValidationError};
use crate::logger::{self, LogTag};
use crate::proxy::ProxyConfig;
use std::sync::Arc;

pub struct SessionValidator {
    connector: Arc<dyn SessionConnector>,
    credentials: AppCredentials,
}

impl SessionValidator {
    pub fn new(connector: Arc<dyn SessionConnector>, credentials: AppCredentials) -> Self {
        Self {
            connector,
            credentials,
        }
    }

    /// Open with `token`, check authorization, fetch the profile, close
    pub async fn validate(
        &self,
        token: &str,
        proxy: Option<&ProxyConfig>,
    ) -> Result<RemoteProfile, ValidationError> {
        let params = ConnectParams {
            api_id: self.credentials.api_id,
            api_hash: self.credentials.api_hash.clone(),
            proxy: proxy.cloned(),
            token: Some(token.to_string()),
        };

        logger::debug(
            LogTag::Session,
            &format!("Validating stored token {}", shorten_secret(token)),
        );

        let mut session = self.connector.connect(&params).await?;
        let result = Self::check(session.as_mut()).await;
        session.disconnect().await;

        match &result {
            Ok(profile) => logger::info(
                LogTag::Session,
                &format!("Stored token valid for {}", profile.summary()),
            ),
            Err(e) => logger::warning(LogTag::Session, &format!("Stored token rejected: {}", e)),
        }
        result
    }

    async fn check(session: &mut dyn RemoteSession) -> Result<RemoteProfile, ValidationError> {
        match session.is_authorized().await {
            Ok(true) => {}
            Ok(false) | Err(RemoteError::Unauthorized) => {
                return Err(ValidationError::Unauthorized)
            }
            Err(e) => return Err(e.into()),
        }

        match session.fetch_profile().await {
            Ok(profile) => Ok(profile),
            Err(RemoteError::Unauthorized) => Err(ValidationError::Unauthorized),
            Err(e) => Err(e.into()),
        }
    }

    /// Read-only probe flattening the validation result
    pub async fn probe(&self, token: &str, proxy: Option<&ProxyConfig>) -> TokenStatus {
        match self.validate(token, proxy).await {
            Ok(profile) => TokenStatus::Valid(profile),
            Err(ValidationError::Unauthorized) => TokenStatus::Unauthorized,
            Err(ValidationError::Remote(e)) => TokenStatus::Error(e.to_string()),
        }
    }
}
