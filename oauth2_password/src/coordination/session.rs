use http::HeaderMap;

use crate::service::AuthService;
use crate::session::{Session, SessionStatus};

use super::errors::CoordinationError;

impl AuthService {
    pub async fn load_session(&self, headers: &HeaderMap) -> Result<Session, CoordinationError> {
        Ok(self.inner.sessions.load(headers).await?)
    }

    /// Flags of the caller's session. Anonymous callers get all `false`.
    pub async fn session_status(&self, headers: &HeaderMap) -> Result<SessionStatus, CoordinationError> {
        Ok(self.load_session(headers).await?.status())
    }

    /// Gate for routes that need a logged-in caller.
    ///
    /// Refreshes the session's lifetime and returns the headers that carry the renewed cookie.
    pub async fn require_authenticated(
        &self,
        headers: &HeaderMap,
    ) -> Result<(Session, HeaderMap), CoordinationError> {
        let session = self.inner.sessions.load(headers).await?;
        if !session.state().is_authenticated() {
            tracing::debug!("Rejected anonymous request to authenticated route");
            return Err(CoordinationError::Unauthorized);
        }
        let set_cookie = self.inner.sessions.touch(&session).await?;
        Ok((session, set_cookie))
    }

    /// Gate for routes that only make sense before logging in.
    pub async fn require_unauthenticated(&self, headers: &HeaderMap) -> Result<(), CoordinationError> {
        let session = self.inner.sessions.load(headers).await?;
        if session.state().is_authenticated() {
            tracing::debug!("Rejected authenticated request to anonymous route");
            return Err(CoordinationError::UnexpectedlyAuthorized);
        }
        Ok(())
    }

    pub async fn logout(&self, headers: &HeaderMap) -> Result<HeaderMap, CoordinationError> {
        let session = self.inner.sessions.load(headers).await?;
        let set_cookie = self.inner.sessions.clear(&session).await?;
        tracing::info!("Session cleared");
        Ok(set_cookie)
    }
}
