use serde::{Deserialize, Serialize};

/// Envelope for everything written to the cache store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct CacheData {
    pub value: String,
}
