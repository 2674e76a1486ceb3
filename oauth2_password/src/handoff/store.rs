use chrono::{Duration, Utc};

use crate::oauth2::ExternalIdentity;
use crate::storage::{CacheData, SharedCacheStore};
use crate::utils::gen_random_string;

use super::errors::HandoffError;
use super::types::HandoffRecord;

const HANDOFF_PREFIX: &str = "handoff";
const CODE_BYTES: usize = 32;
const MAX_ATTEMPTS: usize = 3;

/// Single-use codes that carry a provider identity from the callback to the
/// frontend's follow-up request.
#[derive(Clone)]
pub(crate) struct HandoffCache {
    cache: SharedCacheStore,
    ttl: u64,
}

impl HandoffCache {
    pub(crate) fn new(cache: SharedCacheStore, ttl: u64) -> Self {
        Self { cache, ttl }
    }

    /// Park an identity and return the code that redeems it.
    #[tracing::instrument(skip_all, fields(provider_user_id = %external.provider_user_id))]
    pub(crate) async fn issue(
        &self,
        external: ExternalIdentity,
        access_token: String,
    ) -> Result<String, HandoffError> {
        let record = HandoffRecord {
            external,
            access_token,
            expires_at: Utc::now() + Duration::seconds(self.ttl as i64),
        };
        let data = CacheData::try_from(&record)?;

        for _ in 0..MAX_ATTEMPTS {
            let code = gen_random_string(CODE_BYTES)?;
            let stored = self
                .cache
                .lock()
                .await
                .put_if_not_exists(HANDOFF_PREFIX, &code, data.clone(), self.ttl)
                .await?;
            if stored {
                tracing::debug!("Issued handoff code");
                return Ok(code);
            }
            tracing::warn!("Handoff code collision, retrying");
        }

        Err(HandoffError::CodeCollision)
    }

    /// Consume a code. Unknown, already used and expired codes all yield `None`.
    #[tracing::instrument(skip_all)]
    pub(crate) async fn redeem(&self, code: &str) -> Result<Option<HandoffRecord>, HandoffError> {
        let Some(data) = self.cache.lock().await.take(HANDOFF_PREFIX, code).await? else {
            return Ok(None);
        };

        let record = HandoffRecord::try_from(data)?;
        if record.expires_at <= Utc::now() {
            tracing::debug!("Handoff code expired");
            return Ok(None);
        }

        Ok(Some(record))
    }
}
