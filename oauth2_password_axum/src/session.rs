use axum::{extract::FromRequestParts, response::IntoResponse, response::Response};
use http::request::Parts;
use oauth2_password::{AuthService, CoordinationError, Session};

use super::error::{INTERNAL_ERROR, error_response};

/// The caller's authenticated session, available as an Axum extractor.
///
/// Behind [`require_authenticated`](crate::require_authenticated) the session loaded by
/// the middleware is reused. Elsewhere it is loaded from the cookie, and anonymous
/// callers are rejected with 400.
#[derive(Clone, Debug)]
pub struct AuthSession(pub Session);

impl AuthSession {
    pub fn account_id(&self) -> &str {
        self.0.account_id().unwrap_or_default()
    }
}

impl FromRequestParts<AuthService> for AuthSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        service: &AuthService,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(Self(session.clone()));
        }

        let session = service
            .load_session(&parts.headers)
            .await
            .map_err(|e| error_response(e, INTERNAL_ERROR).into_response())?;

        if !session.state().is_authenticated() {
            return Err(error_response(CoordinationError::Unauthorized, INTERNAL_ERROR).into_response());
        }
        Ok(Self(session))
    }
}
