mod errors;
mod storage;
mod types;

pub use errors::AccountError;
pub(crate) use storage::AccountStore;
pub use types::{Account, AccountSearchField, OAuthBinding, Profile};
