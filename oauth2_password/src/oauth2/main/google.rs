use crate::config::OAuth2Config;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::{GoogleUserInfo, TokenResponse};

pub(super) async fn exchange_code_for_token(
    client: &reqwest::Client,
    config: &OAuth2Config,
    code: &str,
) -> Result<String, OAuth2Error> {
    let response = client
        .post(config.token_url.as_str())
        .form(&[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("Token Exchange Response: {:#?}", response);
        return Err(OAuth2Error::TokenExchange(status.to_string()));
    }

    let response_body = response
        .text()
        .await
        .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;
    let response_json: TokenResponse = serde_json::from_str(&response_body)
        .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

    Ok(response_json.access_token)
}

pub(super) async fn fetch_user_data_from_google(
    client: &reqwest::Client,
    config: &OAuth2Config,
    access_token: &str,
) -> Result<GoogleUserInfo, OAuth2Error> {
    let response = client
        .get(config.userinfo_url.as_str())
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(OAuth2Error::FetchUserInfo(status.to_string()));
    }

    let response_body = response
        .text()
        .await
        .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

    let user_data: GoogleUserInfo = serde_json::from_str(&response_body)
        .map_err(|e| OAuth2Error::Serde(format!("Failed to deserialize response body: {e}")))?;

    tracing::debug!(provider_user_id = %user_data.id, "Fetched Google user info");
    Ok(user_data)
}
