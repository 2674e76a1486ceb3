mod errors;
mod main;
mod types;

pub use errors::SessionError;
pub(crate) use main::SessionManager;
pub use types::{Session, SessionState, SessionStatus};
