use serde::{Deserialize, Serialize};

/// Query string of the provider's redirect back to us.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub(super) access_token: String,
}

/// Google's v2 userinfo document.
#[derive(Debug, Deserialize)]
pub(super) struct GoogleUserInfo {
    pub(super) id: String,
    pub(super) email: String,
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) picture: Option<String>,
}

/// The identity asserted by the provider for one completed authorization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalIdentity {
    pub provider_user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

impl From<GoogleUserInfo> for ExternalIdentity {
    fn from(info: GoogleUserInfo) -> Self {
        Self {
            name: info.name.unwrap_or_else(|| info.email.clone()),
            provider_user_id: info.id,
            email: info.email,
            picture: info.picture,
        }
    }
}
