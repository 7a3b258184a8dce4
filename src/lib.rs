//! tgauth: Telegram account login orchestration
//!
//! The login state machine, its retry and resend policy, stored-session
//! validation and the credential store it persists into. The account
//! provider's protocol is an external collaborator behind
//! `auth::SessionConnector`.

pub mod arguments;
pub mod auth;
pub mod config;
pub mod errors;
pub mod logger;
pub mod paths;
pub mod proxy;
pub mod store;
