use axum::{Json, extract::State};
use http::HeaderMap;
use oauth2_password::AuthService;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiJson, ApiResponse, INTERNAL_ERROR, IntoResponseError};
use super::session::AuthSession;

type ApiResult = Result<(HeaderMap, Json<ApiResponse>), ApiError>;

#[derive(Debug, Deserialize)]
pub(super) struct Credentials {
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Password")]
    password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct PasswordChange {
    #[serde(rename = "OldPassword", default)]
    old_password: String,
    #[serde(rename = "NewPassword")]
    new_password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct HandoffRedemption {
    #[serde(rename = "Code")]
    code: String,
}

#[derive(Debug, Serialize)]
pub(super) struct SessionResponse {
    #[serde(rename = "Auth")]
    auth: bool,
    #[serde(rename = "HasPassword")]
    has_password: bool,
    #[serde(rename = "Google")]
    google: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct Person {
    #[serde(rename = "Name")]
    name: &'static str,
    #[serde(rename = "Number")]
    number: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct PeopleResponse {
    #[serde(rename = "People")]
    people: Vec<Person>,
}

pub(super) async fn session(
    State(service): State<AuthService>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let status = service
        .session_status(&headers)
        .await
        .into_response_error(INTERNAL_ERROR)?;

    Ok(Json(SessionResponse {
        auth: status.authenticated,
        has_password: status.has_password,
        google: status.has_oauth,
    }))
}

/// Placeholder data for logged-in clients.
pub(super) async fn people(session: AuthSession) -> Json<PeopleResponse> {
    tracing::debug!(account_id = %session.account_id(), "Serving people");
    Json(PeopleResponse {
        people: vec![
            Person {
                name: "Jack Hill",
                number: 421,
            },
            Person {
                name: "Jack Wright",
                number: 212,
            },
        ],
    })
}

pub(super) async fn authenticate(
    State(service): State<AuthService>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult {
    let set_cookie = service
        .authenticate(&headers, &body.email, &body.password)
        .await
        .into_response_error(INTERNAL_ERROR)?;
    Ok((set_cookie, ApiResponse::success("Successfully logged in!")))
}

pub(super) async fn register(
    State(service): State<AuthService>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult {
    let set_cookie = service
        .register(&headers, &body.email, &body.password)
        .await
        .into_response_error(INTERNAL_ERROR)?;
    Ok((set_cookie, ApiResponse::success("Successfully registered!")))
}

pub(super) async fn change_password(
    State(service): State<AuthService>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<PasswordChange>,
) -> ApiResult {
    let set_cookie = service
        .change_password(&headers, &body.old_password, &body.new_password)
        .await
        .into_response_error("Password change failed. Internal server error.")?;
    Ok((set_cookie, ApiResponse::success("Password successfully changed!")))
}

pub(super) async fn logout(State(service): State<AuthService>, headers: HeaderMap) -> ApiResult {
    let set_cookie = service
        .logout(&headers)
        .await
        .into_response_error(INTERNAL_ERROR)?;
    Ok((set_cookie, ApiResponse::success("Successfully logged out!")))
}

pub(super) async fn redeem_handoff(
    State(service): State<AuthService>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<HandoffRedemption>,
) -> ApiResult {
    let (set_cookie, outcome) = service
        .resolve_oauth_handoff(&headers, &body.code)
        .await
        .into_response_error(INTERNAL_ERROR)?;
    Ok((set_cookie, ApiResponse::success(outcome.message())))
}

pub(super) async fn unlink_google(
    State(service): State<AuthService>,
    headers: HeaderMap,
) -> ApiResult {
    let set_cookie = service
        .unlink_oauth(&headers)
        .await
        .into_response_error("Google unlink failed. Internal server error.")?;
    Ok((set_cookie, ApiResponse::success("Successfully unlinked Google!")))
}
