//! Shared fixtures for unit tests.

use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, SET_COOKIE},
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

use crate::config::{AuthConfig, HandoffConfig, OAuth2Config, SessionConfig, StoreConfig};
use crate::oauth2::ExternalIdentity;
use crate::service::AuthService;
use crate::storage::{CacheStore, InMemoryCacheStore, SharedCacheStore};

pub(crate) fn test_config() -> AuthConfig {
    AuthConfig {
        store: StoreConfig {
            data_store_type: "sqlite".to_string(),
            data_store_url: "sqlite::memory:".to_string(),
            cache_store_type: "memory".to_string(),
            cache_store_url: String::new(),
            table_prefix: "o2p_".to_string(),
        },
        session: SessionConfig {
            cookie_name: "SessionId".to_string(),
            max_age: 600,
            secure: false,
            secret: b"test-secret-test-secret-test-secret!".to_vec(),
        },
        oauth2: OAuth2Config {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            redirect_uri: "http://localhost:3001/callback/google".to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "http://127.0.0.1:9/token".to_string(),
            userinfo_url: "http://127.0.0.1:9/userinfo".to_string(),
            scope: "email profile".to_string(),
            http_timeout: std::time::Duration::from_secs(5),
            failure_redirect: "/".to_string(),
        },
        handoff: HandoffConfig { ttl: 600 },
    }
}

pub(crate) async fn test_service() -> AuthService {
    test_service_with(test_config()).await
}

pub(crate) async fn test_service_with(config: AuthConfig) -> AuthService {
    AuthService::init(config).await.expect("service")
}

pub(crate) fn memory_cache() -> SharedCacheStore {
    let store: Box<dyn CacheStore> = Box::new(InMemoryCacheStore::new());
    Arc::new(Mutex::new(store))
}

pub(crate) fn sample_identity(provider_user_id: &str) -> ExternalIdentity {
    ExternalIdentity {
        provider_user_id: provider_user_id.to_string(),
        email: format!("{provider_user_id}@example.com"),
        name: format!("User {provider_user_id}"),
        picture: Some(format!("https://example.com/{provider_user_id}.png")),
    }
}

/// Turn a response's `Set-Cookie` headers into the `Cookie` header of the next request.
pub(crate) fn cookie_header_from(set_cookie: &HeaderMap) -> HeaderMap {
    let cookies: Vec<&str> = set_cookie
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect();

    let mut headers = HeaderMap::new();
    if !cookies.is_empty() {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&cookies.join("; ")).expect("cookie header"),
        );
    }
    headers
}

type Identities = Arc<StdMutex<HashMap<String, ExternalIdentity>>>;

/// Token and userinfo endpoints on an ephemeral local port.
///
/// A registered authorization code `c` exchanges for access token `token-c`, which in
/// turn resolves to the identity registered for `c`.
pub(crate) struct MockProvider {
    base_url: String,
    identities: Identities,
}

impl MockProvider {
    pub(crate) async fn start() -> Self {
        let identities: Identities = Arc::default();
        let app = Router::new()
            .route("/token", post(mock_token))
            .route("/userinfo", get(mock_userinfo))
            .with_state(identities.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock provider");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock provider");
        });

        Self {
            base_url: format!("http://{addr}"),
            identities,
        }
    }

    pub(crate) fn register_code(&self, code: &str, identity: ExternalIdentity) {
        self.identities
            .lock()
            .expect("identities")
            .insert(code.to_string(), identity);
    }

    pub(crate) fn configure(&self, config: &mut OAuth2Config) {
        config.token_url = format!("{}/token", self.base_url);
        config.userinfo_url = format!("{}/userinfo", self.base_url);
    }
}

async fn mock_token(
    State(identities): State<Identities>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let code = form.get("code").cloned().unwrap_or_default();
    let known = identities.lock().expect("identities").contains_key(&code);
    if !known || form.get("grant_type").map(String::as_str) != Some("authorization_code") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))).into_response();
    }
    Json(json!({
        "access_token": format!("token-{code}"),
        "token_type": "Bearer",
        "expires_in": 3599,
    }))
    .into_response()
}

async fn mock_userinfo(State(identities): State<Identities>, headers: HeaderMap) -> Response {
    let code = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer token-"))
        .unwrap_or_default()
        .to_string();
    let identity = identities.lock().expect("identities").get(&code).cloned();
    match identity {
        Some(identity) => Json(json!({
            "id": identity.provider_user_id,
            "email": identity.email,
            "verified_email": true,
            "name": identity.name,
            "picture": identity.picture,
        }))
        .into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}
