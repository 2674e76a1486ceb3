//! Email/password and Google OAuth2 authentication with account linking.
//!
//! [`AuthService`] owns the account store, the session store and the OAuth2 broker.
//! Its methods implement registration, password login, password change, OAuth2
//! login/link/unlink through a single-use handoff code, and logout. Each method takes
//! the request headers and returns the `Set-Cookie` headers for the response, so any
//! HTTP framework can sit on top.

mod config;
mod coordination;
mod handoff;
mod oauth2;
mod password;
mod service;
mod session;
mod storage;
mod userdb;
mod utils;

#[cfg(test)]
mod test_utils;

pub use config::{AuthConfig, ConfigError, HandoffConfig, OAuth2Config, SessionConfig, StoreConfig};
pub use coordination::{
    CONFLICT_ALREADY_LINKED, CONFLICT_EMAIL_HAS_ACCOUNT, CONFLICT_EMAIL_REGISTERED,
    CoordinationError, LinkOutcome, NOT_LINKED, PASSWORD_REQUIRED,
};
pub use handoff::HandoffError;
pub use oauth2::{CallbackQuery, ExternalIdentity, OAuth2Error};
pub use password::PasswordError;
pub use service::AuthService;
pub use session::{Session, SessionError, SessionState, SessionStatus};
pub use storage::StorageError;
pub use userdb::{Account, AccountError, OAuthBinding, Profile};
pub use utils::UtilError;
