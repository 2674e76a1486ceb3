use axum::{
    Form, Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Identity the mock provider reports for an authorization code.
#[derive(Clone, Debug)]
pub struct MockIdentity {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl MockIdentity {
    pub fn new(id: &str, email: &str) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            name: format!("Mock {id}"),
        }
    }
}

type Identities = Arc<Mutex<HashMap<String, MockIdentity>>>;

/// Google token and userinfo endpoints on an ephemeral local port.
///
/// A registered code `c` exchanges for the access token `token-c`, which resolves to
/// the identity registered for `c`.
pub struct MockProvider {
    pub base_url: String,
    identities: Identities,
    handle: JoinHandle<()>,
}

impl MockProvider {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let identities: Identities = Arc::default();
        let app = Router::new()
            .route("/token", post(token))
            .route("/userinfo", get(userinfo))
            .with_state(identities.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock provider stopped: {e}");
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            identities,
            handle,
        })
    }

    pub fn register_code(&self, code: &str, identity: MockIdentity) {
        self.identities
            .lock()
            .expect("identities lock")
            .insert(code.to_string(), identity);
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn token(
    State(identities): State<Identities>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let code = form.get("code").cloned().unwrap_or_default();
    let known = identities.lock().expect("identities lock").contains_key(&code);
    if !known {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))).into_response();
    }
    Json(json!({
        "access_token": format!("token-{code}"),
        "token_type": "Bearer",
        "expires_in": 3599,
    }))
    .into_response()
}

async fn userinfo(State(identities): State<Identities>, headers: HeaderMap) -> Response {
    let code = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer token-"))
        .unwrap_or_default()
        .to_string();
    let identity = identities.lock().expect("identities lock").get(&code).cloned();
    match identity {
        Some(identity) => Json(json!({
            "id": identity.id,
            "email": identity.email,
            "verified_email": true,
            "name": identity.name,
        }))
        .into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}
