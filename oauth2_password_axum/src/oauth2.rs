use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use http::StatusCode;
use oauth2_password::{AuthService, CallbackQuery, CoordinationError};
use serde::Deserialize;

use super::error::{ApiResponse, INTERNAL_ERROR, IntoResponseError};

#[derive(Debug, Deserialize)]
pub(super) struct GoogleAuthQuery {
    #[serde(rename = "redirectUrl")]
    redirect_url: Option<String>,
}

/// Send the browser to Google. `redirectUrl` is where it will come back to.
pub(super) async fn google_auth(
    State(service): State<AuthService>,
    Query(params): Query<GoogleAuthQuery>,
) -> Response {
    let Some(return_target) = params.redirect_url.filter(|u| !u.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            ApiResponse::failure("Missing redirectUrl."),
        )
            .into_response();
    };

    match service
        .oauth2_authorization_url(&return_target)
        .into_response_error(INTERNAL_ERROR)
    {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Google's redirect back to us.
///
/// Every failure ends in a plain redirect to the configured fallback page.
pub(super) async fn google_callback(
    State(service): State<AuthService>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    match service.handle_oauth2_callback(&query).await {
        Ok(target) => Redirect::temporary(&target),
        Err(CoordinationError::StateMismatch) => {
            tracing::warn!("Invalid OAuth2 state on callback");
            Redirect::temporary(service.oauth2_failure_redirect())
        }
        Err(err) => {
            let _ = err.log();
            Redirect::temporary(service.oauth2_failure_redirect())
        }
    }
}
