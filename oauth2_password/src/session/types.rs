use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::errors::SessionError;
use crate::storage::CacheData;

/// Per-browser server-side state.
///
/// The session is authenticated exactly when `account_id` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub account_id: Option<String>,
    pub has_password: bool,
    pub has_oauth: bool,
}

impl SessionState {
    pub(crate) fn authenticated(account_id: &str, has_password: bool, has_oauth: bool) -> Self {
        Self {
            account_id: Some(account_id.to_string()),
            has_password,
            has_oauth,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.account_id.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            authenticated: self.is_authenticated(),
            has_password: self.has_password,
            has_oauth: self.has_oauth,
        }
    }
}

/// Read-only view of a session, with every flag defaulting to false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub has_password: bool,
    pub has_oauth: bool,
}

/// A session as loaded for one request.
///
/// `id` is `None` when the request carried no usable session cookie.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub(crate) id: Option<String>,
    pub(crate) state: SessionState,
}

impl Session {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn account_id(&self) -> Option<&str> {
        self.state.account_id.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct StoredSession {
    pub(super) state: SessionState,
    pub(super) expires_at: DateTime<Utc>,
    pub(super) ttl: u64,
}

impl TryFrom<&StoredSession> for CacheData {
    type Error = SessionError;

    fn try_from(data: &StoredSession) -> Result<Self, Self::Error> {
        Ok(Self {
            value: serde_json::to_string(data).map_err(|e| SessionError::Serde(e.to_string()))?,
        })
    }
}

impl TryFrom<CacheData> for StoredSession {
    type Error = SessionError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| SessionError::Serde(e.to_string()))
    }
}
