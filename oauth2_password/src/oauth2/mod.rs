mod errors;
mod main;
mod types;

pub use errors::OAuth2Error;
pub(crate) use main::{OAuth2Broker, append_handoff_params};
pub use types::{CallbackQuery, ExternalIdentity};
