use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serde error: {0}")]
    Serde(String),

    #[error("Header error: {0}")]
    HeaderError(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
