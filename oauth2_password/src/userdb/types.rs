use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::AccountError;

/// A stored account.
///
/// Every account holds at least one credential: a password hash, an OAuth binding, or both.
/// The constructors below are the only way to build a new account and each supplies one.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub oauth: Option<OAuthBinding>,
    pub profile: Option<Profile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Link between an account and one external Google identity.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthBinding {
    pub provider_user_id: String,
    #[serde(skip_serializing, default)]
    pub access_token: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("has_password", &self.has_password())
            .field("oauth", &self.oauth)
            .field("profile", &self.profile)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl fmt::Debug for OAuthBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthBinding")
            .field("provider_user_id", &self.provider_user_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub name: String,
    pub picture: Option<String>,
}

impl Account {
    pub(crate) fn with_password(email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: Some(password_hash),
            oauth: None,
            profile: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn with_oauth(email: &str, binding: OAuthBinding, profile: Profile) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: None,
            oauth: Some(binding),
            profile: Some(profile),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn has_oauth(&self) -> bool {
        self.oauth.is_some()
    }
}

/// Flat table row as read from either backend.
#[derive(sqlx::FromRow)]
pub(super) struct AccountRow {
    pub(super) id: String,
    pub(super) email: String,
    pub(super) password_hash: Option<String>,
    pub(super) oauth_provider_id: Option<String>,
    pub(super) oauth_access_token: Option<String>,
    pub(super) profile_name: Option<String>,
    pub(super) profile_picture: Option<String>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let oauth = match (row.oauth_provider_id, row.oauth_access_token) {
            (Some(provider_user_id), access_token) => Some(OAuthBinding {
                provider_user_id,
                access_token: access_token.unwrap_or_default(),
            }),
            (None, _) => None,
        };

        if row.password_hash.is_none() && oauth.is_none() {
            return Err(AccountError::InvalidData(format!(
                "account {} has no credential",
                row.id
            )));
        }

        let profile = row.profile_name.map(|name| Profile {
            name,
            picture: row.profile_picture,
        });

        Ok(Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            oauth,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Lookup keys for [`Account`]s. Each one matches at most one row.
#[derive(Debug, Clone)]
pub enum AccountSearchField {
    Id(String),
    Email(String),
    OAuthProviderId(String),
}

impl fmt::Display for AccountSearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "Id({id})"),
            Self::Email(email) => write!(f, "Email({email})"),
            Self::OAuthProviderId(id) => write!(f, "OAuthProviderId({id})"),
        }
    }
}
