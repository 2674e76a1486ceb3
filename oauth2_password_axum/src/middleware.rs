use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::header::SET_COOKIE;
use oauth2_password::AuthService;

use super::error::{INTERNAL_ERROR, error_response};

/// Let only authenticated callers through, renewing their session cookie.
///
/// The loaded session is stored in the request extensions for [`AuthSession`](crate::AuthSession).
pub async fn require_authenticated(
    State(service): State<AuthService>,
    mut req: Request,
    next: Next,
) -> Response {
    match service.require_authenticated(req.headers()).await {
        Ok((session, renewed)) => {
            req.extensions_mut().insert(session);
            let mut response = next.run(req).await;
            // A handler that wrote the session already sent a fresh cookie
            if !response.headers().contains_key(SET_COOKIE) {
                response.headers_mut().extend(renewed);
            }
            response
        }
        Err(err) => error_response(err, INTERNAL_ERROR).into_response(),
    }
}

/// Let only anonymous callers through.
pub async fn require_unauthenticated(
    State(service): State<AuthService>,
    req: Request,
    next: Next,
) -> Response {
    match service.require_unauthenticated(req.headers()).await {
        Ok(()) => next.run(req).await,
        Err(err) => error_response(err, INTERNAL_ERROR).into_response(),
    }
}
