use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

use super::test_server::{FRONTEND_LOGIN, TestServer};

/// Cookie-keeping HTTP client standing in for the browser and the frontend.
///
/// Redirects are not followed, so tests can inspect each `Location`.
pub struct MockBrowser {
    client: Client,
    base_url: String,
}

impl MockBrowser {
    pub fn new(server: &TestServer) -> Self {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .expect("http client");

        Self {
            client,
            base_url: server.base_url.clone(),
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("POST request")
    }

    pub async fn post(&self, path: &str) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("POST request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("DELETE request")
    }

    pub async fn register(&self, email: &str, password: &str) -> Response {
        self.post_json(
            "/api/register",
            &json!({"Email": email, "Password": password}),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_json("/api/auth", &json!({"Email": email, "Password": password}))
            .await
    }

    /// `(Auth, HasPassword, Google)` from `/api/session`.
    pub async fn session_flags(&self) -> (bool, bool, bool) {
        let body = body_json(self.get("/api/session").await).await;
        (
            body["Auth"].as_bool().expect("Auth"),
            body["HasPassword"].as_bool().expect("HasPassword"),
            body["Google"].as_bool().expect("Google"),
        )
    }

    /// Run the Google round trip up to the frontend redirect and return the handoff code.
    ///
    /// `code` must be registered with the server's mock provider.
    pub async fn google_handoff_code(&self, code: &str) -> String {
        let start = self
            .get(&format!("/auth/google?redirectUrl={FRONTEND_LOGIN}"))
            .await;
        assert_eq!(start.status(), StatusCode::TEMPORARY_REDIRECT);
        let state = query_param(&location(&start), "state").expect("state in consent URL");

        let callback = self
            .get(&format!(
                "/callback/google?state={}&code={code}",
                urlencode(&state)
            ))
            .await;
        assert_eq!(callback.status(), StatusCode::TEMPORARY_REDIRECT);

        let target = location(&callback);
        assert!(target.starts_with(FRONTEND_LOGIN), "unexpected target {target}");
        assert_eq!(query_param(&target, "provider").as_deref(), Some("google"));
        assert_eq!(query_param(&target, "success").as_deref(), Some("true"));
        query_param(&target, "code").expect("handoff code")
    }

    pub async fn redeem(&self, handoff_code: &str) -> Response {
        self.post_json("/api/authOTC", &json!({"Code": handoff_code}))
            .await
    }
}

pub async fn body_json(response: Response) -> Value {
    response.json().await.expect("JSON body")
}

/// Status and `Msg` of a JSON API response.
pub async fn status_msg(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = body_json(response).await;
    (status, body["Msg"].as_str().unwrap_or_default().to_string())
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Location header")
        .to_string()
}

pub fn query_param(target: &str, name: &str) -> Option<String> {
    let url = url::Url::parse(target)
        .or_else(|_| url::Url::parse("http://localhost").and_then(|base| base.join(target)))
        .ok()?;
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
