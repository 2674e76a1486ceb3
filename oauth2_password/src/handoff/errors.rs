use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum HandoffError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serde error: {0}")]
    Serde(String),

    #[error("Could not allocate a unique handoff code")]
    CodeCollision,

    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
