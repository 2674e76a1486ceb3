//! Coordination layer for the authentication flows.
//!
//! These `AuthService` methods are the crate's public operations. Each one takes the
//! request headers and returns the `Set-Cookie` headers the response must carry.

mod errors;
mod oauth2;
mod password;
mod session;

pub use errors::{
    CONFLICT_ALREADY_LINKED, CONFLICT_EMAIL_HAS_ACCOUNT, CONFLICT_EMAIL_REGISTERED,
    CoordinationError, NOT_LINKED, PASSWORD_REQUIRED,
};
pub use oauth2::LinkOutcome;
