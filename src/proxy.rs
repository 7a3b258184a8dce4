//! Relay descriptor parsing
//!
//! Accepts the compact `scheme:host:port[:username[:password]]` form. The
//! scheme is one of `socks4`, `socks5` or `http` (case-insensitive). Anything
//! else fails construction; there is no fallback to a direct connection.

use crate::errors::ProxyError;
use crate::logger::{self, LogTag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyScheme {
    Socks4,
    Socks5,
    Http,
}

impl ProxyScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyScheme::Socks4 => "socks4",
            ProxyScheme::Socks5 => "socks5",
            ProxyScheme::Http => "http",
        }
    }
}

impl FromStr for ProxyScheme {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "socks4" => Ok(ProxyScheme::Socks4),
            "socks5" => Ok(ProxyScheme::Socks5),
            "http" => Ok(ProxyScheme::Http),
            other => Err(ProxyError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for ProxyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed connection relay parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub scheme: ProxyScheme,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Parse a `scheme:host:port[:username[:password]]` descriptor
    pub fn parse(descriptor: &str) -> Result<Self, ProxyError> {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return Err(ProxyError::Empty);
        }

        let parts: Vec<&str> = descriptor.split(':').collect();
        if parts.len() > 5 {
            return Err(ProxyError::TooManyFields(parts.len()));
        }

        let scheme: ProxyScheme = parts[0].parse()?;

        let host = parts
            .get(1)
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .ok_or(ProxyError::MissingField("host"))?
            .to_string();

        let port_raw = parts
            .get(2)
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .ok_or(ProxyError::MissingField("port"))?;
        let port: u16 = port_raw
            .parse()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| ProxyError::InvalidPort(port_raw.to_string()))?;

        let optional = |idx: usize| {
            parts
                .get(idx)
                .map(|v| v.to_string())
                .filter(|v| !v.is_empty())
        };

        let proxy = Self {
            scheme,
            host,
            port,
            username: optional(3),
            password: optional(4),
        };

        logger::debug(LogTag::Proxy, &format!("Parsed relay {}", proxy));
        Ok(proxy)
    }

    /// Parse an optional descriptor where empty means "direct connection"
    pub fn parse_optional(descriptor: &str) -> Result<Option<Self>, ProxyError> {
        if descriptor.trim().is_empty() {
            Ok(None)
        } else {
            Self::parse(descriptor).map(Some)
        }
    }

    /// `host:port` for log lines
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some()
    }
}

impl FromStr for ProxyConfig {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders the descriptor form with the password masked
impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.scheme, self.host, self.port)?;
        if let Some(user) = &self.username {
            write!(f, ":{}", user)?;
            if self.password.is_some() {
                f.write_str(":****")?;
            }
        }
        Ok(())
    }
}
