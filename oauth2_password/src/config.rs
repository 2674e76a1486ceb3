//! Startup configuration.
//!
//! Every setting is read once into an immutable [`AuthConfig`] that is handed to the
//! components that need it. Nothing here is consulted lazily at request time.

use std::{env, fmt, str::FromStr, time::Duration};
use thiserror::Error;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const GOOGLE_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email https://www.googleapis.com/auth/userinfo.profile";

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub oauth2: OAuth2Config,
    pub handoff: HandoffConfig,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// `sqlite` or `postgres`
    pub data_store_type: String,
    pub data_store_url: String,
    /// `memory` or `redis`
    pub cache_store_type: String,
    pub cache_store_url: String,
    pub table_prefix: String,
}

#[derive(Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Seconds. Also the server-side record TTL.
    pub max_age: u64,
    pub secure: bool,
    pub secret: Vec<u8>,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .field("secret", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scope: String,
    pub http_timeout: Duration,
    /// Where the browser is sent when the provider callback cannot be completed.
    pub failure_redirect: String,
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("scope", &self.scope)
            .field("http_timeout", &self.http_timeout)
            .field("failure_redirect", &self.failure_redirect)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HandoffConfig {
    /// Seconds a one-time handoff code stays redeemable.
    pub ttl: u64,
}

impl AuthConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let store = StoreConfig {
            data_store_type: vars.required("GENERIC_DATA_STORE_TYPE")?,
            data_store_url: vars.required("GENERIC_DATA_STORE_URL")?,
            cache_store_type: vars.required("GENERIC_CACHE_STORE_TYPE")?,
            cache_store_url: vars.or("GENERIC_CACHE_STORE_URL", ""),
            table_prefix: vars.or("DB_TABLE_PREFIX", "o2p_"),
        };

        let secret = vars.required("AUTH_SERVER_SECRET")?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "AUTH_SERVER_SECRET".to_string(),
                value: format!("<{} bytes, need at least {MIN_SECRET_LEN}>", secret.len()),
            });
        }

        let session = SessionConfig {
            cookie_name: vars.or("SESSION_COOKIE_NAME", "__Host-SessionId"),
            max_age: vars.parse_or("SESSION_COOKIE_MAX_AGE", 28800)?,
            secure: vars.parse_or("SESSION_COOKIE_SECURE", true)?,
            secret: secret.into_bytes(),
        };

        let oauth2 = OAuth2Config {
            client_id: vars.required("OAUTH2_GOOGLE_CLIENT_ID")?,
            client_secret: vars.required("OAUTH2_GOOGLE_CLIENT_SECRET")?,
            redirect_uri: vars.required("OAUTH2_REDIRECT_URI")?,
            auth_url: vars.or("OAUTH2_AUTH_URL", GOOGLE_AUTH_URL),
            token_url: vars.or("OAUTH2_TOKEN_URL", GOOGLE_TOKEN_URL),
            userinfo_url: vars.or("OAUTH2_USERINFO_URL", GOOGLE_USERINFO_URL),
            scope: vars.or("OAUTH2_SCOPE", GOOGLE_SCOPE),
            http_timeout: Duration::from_secs(vars.parse_or("OAUTH2_HTTP_TIMEOUT_SECS", 10)?),
            failure_redirect: vars.or("AUTH_FAILURE_REDIRECT", "/"),
        };

        let handoff = HandoffConfig {
            ttl: vars.parse_or("HANDOFF_CODE_TTL", 600)?,
        };

        Ok(Self {
            store,
            session,
            oauth2,
            handoff,
        })
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    fn or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: FromStr>(&self, name: &str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: name.to_string(),
                value,
            }),
        }
    }
}
