use thiserror::Error;

use crate::handoff::HandoffError;
use crate::oauth2::OAuth2Error;
use crate::password::PasswordError;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::userdb::AccountError;
use crate::utils::UtilError;

pub const CONFLICT_EMAIL_REGISTERED: &str = "An user with that email already exists!";
pub const CONFLICT_ALREADY_LINKED: &str = "This Google account is already linked.";
pub const CONFLICT_EMAIL_HAS_ACCOUNT: &str =
    "There is already an account associated with this email address.";
pub const NOT_LINKED: &str = "No Google account is linked.";
pub const PASSWORD_REQUIRED: &str = "Set a password before unlinking Google.";

#[derive(Debug, Error, Clone)]
pub enum CoordinationError {
    /// The request collides with an existing account or binding. Carries a user-facing message.
    #[error("{0}")]
    Conflict(String),

    /// Unknown email or wrong password. The two are deliberately indistinguishable.
    #[error("Invalid login details!")]
    InvalidCredentials,

    #[error("Wrong old password!")]
    WrongPassword,

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Already authenticated")]
    UnexpectedlyAuthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("OAuth2 state mismatch")]
    StateMismatch,

    #[error("Handoff code not found")]
    HandoffNotFound,

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("OAuth2 error: {0}")]
    OAuth2(OAuth2Error),

    #[error("Handoff error: {0}")]
    Handoff(#[from] HandoffError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<OAuth2Error> for CoordinationError {
    fn from(err: OAuth2Error) -> Self {
        match err {
            OAuth2Error::StateMismatch => Self::StateMismatch,
            other => Self::OAuth2(other),
        }
    }
}

impl CoordinationError {
    pub fn log(self) -> Self {
        tracing::error!("{}", self);
        self
    }

    /// True for failures that are the server's fault rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::HandoffNotFound
                | Self::Account(_)
                | Self::Password(_)
                | Self::OAuth2(_)
                | Self::Handoff(_)
                | Self::Session(_)
                | Self::Storage(_)
                | Self::Utils(_)
        )
    }
}
