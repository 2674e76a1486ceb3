use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::oauth2::ExternalIdentity;
use crate::storage::CacheData;

use super::errors::HandoffError;

/// What the callback learned from the provider, parked until the frontend redeems it.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct HandoffRecord {
    pub(crate) external: ExternalIdentity,
    pub(crate) access_token: String,
    pub(crate) expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for HandoffRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffRecord")
            .field("external", &self.external)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl TryFrom<&HandoffRecord> for CacheData {
    type Error = HandoffError;

    fn try_from(record: &HandoffRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            value: serde_json::to_string(record).map_err(|e| HandoffError::Serde(e.to_string()))?,
        })
    }
}

impl TryFrom<CacheData> for HandoffRecord {
    type Error = HandoffError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| HandoffError::Serde(e.to_string()))
    }
}
