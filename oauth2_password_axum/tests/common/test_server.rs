use oauth2_password::{AuthConfig, AuthService};
use oauth2_password_axum::auth_router;
use std::collections::HashMap;
use tokio::task::JoinHandle;

use super::mock_provider::{MockIdentity, MockProvider};

/// Frontend page the OAuth2 flow returns to.
pub const FRONTEND_LOGIN: &str = "http://localhost:3000/login";

fn init_test_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn test_vars(provider: &MockProvider) -> HashMap<&'static str, String> {
    HashMap::from([
        ("GENERIC_DATA_STORE_TYPE", "sqlite".to_string()),
        ("GENERIC_DATA_STORE_URL", "sqlite::memory:".to_string()),
        ("GENERIC_CACHE_STORE_TYPE", "memory".to_string()),
        (
            "AUTH_SERVER_SECRET",
            "integration-secret-integration-secret".to_string(),
        ),
        ("SESSION_COOKIE_NAME", "SessionId".to_string()),
        ("SESSION_COOKIE_SECURE", "false".to_string()),
        ("OAUTH2_GOOGLE_CLIENT_ID", "test-client".to_string()),
        ("OAUTH2_GOOGLE_CLIENT_SECRET", "test-secret".to_string()),
        (
            "OAUTH2_REDIRECT_URI",
            "http://127.0.0.1/callback/google".to_string(),
        ),
        ("OAUTH2_TOKEN_URL", format!("{}/token", provider.base_url)),
        ("OAUTH2_USERINFO_URL", format!("{}/userinfo", provider.base_url)),
        ("OAUTH2_HTTP_TIMEOUT_SECS", "5".to_string()),
    ])
}

/// The auth router served on an ephemeral port, with its own stores and mock provider.
pub struct TestServer {
    server_handle: JoinHandle<()>,
    pub base_url: String,
    pub provider: MockProvider,
}

impl TestServer {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        init_test_tracing();

        let provider = MockProvider::start().await?;
        let vars = test_vars(&provider);
        let config = AuthConfig::from_lookup(|name| vars.get(name).cloned())?;
        let service = AuthService::init(config).await?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = auth_router(service);
        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server stopped: {e}");
            }
        });

        Ok(Self {
            server_handle,
            base_url: format!("http://{addr}"),
            provider,
        })
    }

    /// Make the mock provider accept `code` as a login for the given Google user.
    pub fn google_user(&self, code: &str, google_id: &str, email: &str) {
        self.provider
            .register_code(code, MockIdentity::new(google_id, email));
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}
