mod errors;
mod hash;

pub use errors::PasswordError;
pub(crate) use hash::{hash_password, verify_password};
