//! Telegram account login
//!
//! ```text
//! auth/
//! ├── client.rs        - SessionConnector / RemoteSession seam to the provider
//! ├── orchestrator.rs  - LoginOrchestrator state machine
//! ├── policy.rs        - limits, backoff, code/phone normalization
//! ├── validator.rs     - stored-token validation
//! ├── locks.rs         - one operation per account
//! ├── messages.rs      - English/Arabic message catalogs
//! └── types.rs         - outcomes, failure kinds, derived state
//! ```
//!
//! State machine, derived from the stored `LoginAttempt`:
//!
//! ```text
//! IDLE --start--> CODE_SENT --submit--> AUTHENTICATED
//!                     |  ^                   ^
//!                     |  '-- resent ---------|-- (code expired, resends left)
//!                     '--> AWAITING_2FA -----'
//!                     '--> FAILED (attempt cleared)
//! ```

pub mod client;
pub mod locks;
pub mod messages;
pub mod orchestrator;
pub mod policy;
pub mod types;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use client::{ConnectParams, RemoteProfile, RemoteSession, SessionConnector};
pub use messages::{format_code_hint, Locale, Messages};
pub use orchestrator::LoginOrchestrator;
pub use policy::{normalize_code, validate_phone, LoginPolicy};
pub use types::{AppCredentials, FailureKind, LoginFailure, LoginOutcome, LoginState, TokenStatus};
pub use validator::SessionValidator;
