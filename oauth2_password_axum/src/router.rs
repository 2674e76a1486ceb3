//! Combined router for all authentication endpoints

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use oauth2_password::AuthService;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::middleware::{require_authenticated, require_unauthenticated};
use super::{api, oauth2};

/// Create a router for all authentication endpoints, with request tracing.
///
/// - `GET /api/session`, `POST /api/authOTC`, `GET /auth/google`, `GET /callback/google`: open
/// - `GET /api/people`, `POST /api/changePassword`, `POST /api/logout`, `DELETE /api/google`:
///   authenticated callers only
/// - `POST /api/auth`, `POST /api/register`: anonymous callers only
pub fn auth_router(service: AuthService) -> Router {
    auth_router_no_trace(service).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`auth_router`] without the tracing layer.
pub fn auth_router_no_trace(service: AuthService) -> Router {
    let authenticated = Router::new()
        .route("/api/people", get(api::people))
        .route("/api/changePassword", post(api::change_password))
        .route("/api/logout", post(api::logout))
        .route("/api/google", delete(api::unlink_google))
        .route_layer(middleware::from_fn_with_state(
            service.clone(),
            require_authenticated,
        ));

    let anonymous = Router::new()
        .route("/api/auth", post(api::authenticate))
        .route("/api/register", post(api::register))
        .route_layer(middleware::from_fn_with_state(
            service.clone(),
            require_unauthenticated,
        ));

    Router::new()
        .route("/api/session", get(api::session))
        .route("/api/authOTC", post(api::redeem_handoff))
        .route("/auth/google", get(oauth2::google_auth))
        .route("/callback/google", get(oauth2::google_callback))
        .merge(authenticated)
        .merge(anonymous)
        .with_state(service)
}
