use chrono::{Duration, Utc};
use http::header::HeaderMap;

use crate::config::SessionConfig;
use crate::session::errors::SessionError;
use crate::session::types::{Session, SessionState, StoredSession};
use crate::storage::{CacheData, SharedCacheStore};
use crate::utils::{gen_random_string, header_set_cookie};

use super::cookie::{get_cookie_from_headers, sign_session_id, verify_session_cookie};

const SESSION_PREFIX: &str = "session";

/// Loads and writes the per-browser session.
///
/// Every write re-stores the record with a full TTL and re-issues the cookie, so a
/// session only lapses after `max_age` seconds without writes.
#[derive(Clone)]
pub(crate) struct SessionManager {
    cache: SharedCacheStore,
    config: SessionConfig,
}

impl SessionManager {
    pub(crate) fn new(cache: SharedCacheStore, config: SessionConfig) -> Self {
        Self { cache, config }
    }

    /// Load the session for a request. Missing, forged and expired cookies all give
    /// an empty session.
    pub(crate) async fn load(&self, headers: &HeaderMap) -> Result<Session, SessionError> {
        let Some(cookie) = get_cookie_from_headers(headers, &self.config.cookie_name)? else {
            return Ok(Session::default());
        };

        let Some(session_id) = verify_session_cookie(&self.config.secret, cookie) else {
            tracing::warn!("Session cookie failed signature check");
            return Ok(Session::default());
        };

        let Some(data) = self.cache.lock().await.get(SESSION_PREFIX, session_id).await? else {
            tracing::debug!("Session not found in cache");
            return Ok(Session::default());
        };

        let stored = match StoredSession::try_from(data) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!("Discarding unreadable session record: {e}");
                return Ok(Session::default());
            }
        };

        if stored.expires_at <= Utc::now() {
            tracing::debug!("Session expired");
            return Ok(Session::default());
        }

        Ok(Session {
            id: Some(session_id.to_string()),
            state: stored.state,
        })
    }

    /// Write `state` under the session's current id, creating one if needed.
    pub(crate) async fn save(
        &self,
        session: &Session,
        state: SessionState,
    ) -> Result<HeaderMap, SessionError> {
        let session_id = match &session.id {
            Some(id) => id.clone(),
            None => gen_random_string(32)?,
        };
        self.store(&session_id, state).await
    }

    /// Start an authenticated session under a fresh id, discarding the old record.
    pub(crate) async fn authenticate(
        &self,
        session: &Session,
        state: SessionState,
    ) -> Result<HeaderMap, SessionError> {
        if let Some(old_id) = &session.id {
            self.cache.lock().await.remove(SESSION_PREFIX, old_id).await?;
        }
        let session_id = gen_random_string(32)?;
        tracing::debug!("Rotated session id on authentication");
        self.store(&session_id, state).await
    }

    /// Re-store an unchanged session to extend its lifetime.
    pub(crate) async fn touch(&self, session: &Session) -> Result<HeaderMap, SessionError> {
        match &session.id {
            Some(id) => self.store(id, session.state.clone()).await,
            None => Ok(HeaderMap::new()),
        }
    }

    /// Delete the record and expire the cookie.
    pub(crate) async fn clear(&self, session: &Session) -> Result<HeaderMap, SessionError> {
        if let Some(id) = &session.id {
            self.cache.lock().await.remove(SESSION_PREFIX, id).await?;
        }

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            &self.config.cookie_name,
            "",
            -86400,
            self.config.secure,
        )?;
        Ok(headers)
    }

    async fn store(&self, session_id: &str, state: SessionState) -> Result<HeaderMap, SessionError> {
        let ttl = self.config.max_age;
        let stored = StoredSession {
            state,
            expires_at: Utc::now() + Duration::seconds(ttl as i64),
            ttl,
        };

        self.cache
            .lock()
            .await
            .put_with_ttl(SESSION_PREFIX, session_id, CacheData::try_from(&stored)?, ttl)
            .await?;

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            &self.config.cookie_name,
            &sign_session_id(&self.config.secret, session_id)?,
            ttl as i64,
            self.config.secure,
        )?;
        Ok(headers)
    }
}
