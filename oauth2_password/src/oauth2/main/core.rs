use subtle::ConstantTimeEq;
use url::Url;

use crate::config::OAuth2Config;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::ExternalIdentity;
use crate::utils::gen_random_string;

use super::google::{exchange_code_for_token, fetch_user_data_from_google};
use super::utils::get_client;

const STATE_DELIMITER: char = '|';

/// Drives the Google authorization-code flow.
///
/// The anti-forgery nonce is generated once when the broker is built and lives as long
/// as the process. Every `state` this broker hands out is `nonce|return_target`.
pub(crate) struct OAuth2Broker {
    config: OAuth2Config,
    nonce: String,
    client: reqwest::Client,
}

impl OAuth2Broker {
    pub(crate) fn new(config: OAuth2Config) -> Result<Self, OAuth2Error> {
        let nonce = gen_random_string(24)?;
        let client = get_client(config.http_timeout)?;
        Ok(Self {
            config,
            nonce,
            client,
        })
    }

    pub(crate) fn failure_redirect(&self) -> &str {
        &self.config.failure_redirect
    }

    fn state_for(&self, return_target: &str) -> String {
        format!("{}{STATE_DELIMITER}{return_target}", self.nonce)
    }

    /// Provider URL the browser is sent to. The return target travels inside `state`.
    pub(crate) fn authorization_url(&self, return_target: &str) -> Result<String, OAuth2Error> {
        let state = self.state_for(return_target);
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", self.config.scope.as_str()),
                ("access_type", "online"),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| OAuth2Error::InvalidUrl(e.to_string()))?;

        Ok(url.to_string())
    }

    /// Check the nonce part of `state` and return the embedded return target.
    pub(crate) fn verify_state<'a>(&self, state: &'a str) -> Result<&'a str, OAuth2Error> {
        let (nonce, return_target) = state
            .split_once(STATE_DELIMITER)
            .ok_or(OAuth2Error::StateMismatch)?;

        if !bool::from(nonce.as_bytes().ct_eq(self.nonce.as_bytes())) {
            tracing::warn!("OAuth2 callback carried a foreign state nonce");
            return Err(OAuth2Error::StateMismatch);
        }

        Ok(return_target)
    }

    /// Redeem an authorization code for the provider identity and its access token.
    pub(crate) async fn fetch_identity(
        &self,
        code: &str,
    ) -> Result<(ExternalIdentity, String), OAuth2Error> {
        let access_token = exchange_code_for_token(&self.client, &self.config, code).await?;
        let user_info =
            fetch_user_data_from_google(&self.client, &self.config, &access_token).await?;
        Ok((ExternalIdentity::from(user_info), access_token))
    }
}
