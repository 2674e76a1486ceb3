use reqwest::StatusCode;
use serde_json::json;

use crate::common::mock_browser::{body_json, status_msg};
use crate::common::{MockBrowser, TestServer};

#[tokio::test]
async fn test_register_authenticates_session() {
    // Given a fresh server
    let server = TestServer::start().await.expect("server");
    let browser = MockBrowser::new(&server);

    // When registering a new email
    let response = browser.register("a@x.com", "pw").await;

    // Then the caller is logged in with a password and no Google link
    let (status, msg) = status_msg(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg, "Successfully registered!");
    assert_eq!(browser.session_flags().await, (true, true, false));
}

#[tokio::test]
async fn test_malformed_bodies_answer_internal_error() {
    // Given a fresh server
    let server = TestServer::start().await.expect("server");
    let browser = MockBrowser::new(&server);

    // When posting bodies that are missing required fields
    let no_password = browser
        .post_json("/api/auth", &json!({"Email": "a@x.com"}))
        .await;
    let no_code = browser.post_json("/api/authOTC", &json!({})).await;

    // Then both get the generic 500 in the API's own format
    for response in [no_password, no_code] {
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"Success": false, "Msg": "Internal error."})
        );
    }
    assert_eq!(browser.session_flags().await, (false, false, false));
}

#[tokio::test]
async fn test_anonymous_session_flags() {
    let server = TestServer::start().await.expect("server");
    let browser = MockBrowser::new(&server);

    assert_eq!(browser.session_flags().await, (false, false, false));
}

#[tokio::test]
async fn test_duplicate_register_is_rejected() {
    // Given an email that is already registered
    let server = TestServer::start().await.expect("server");
    MockBrowser::new(&server).register("a@x.com", "pw").await;

    // When another anonymous caller registers it again
    let other = MockBrowser::new(&server);
    let (status, msg) = status_msg(other.register("a@x.com", "other").await).await;

    // Then it is a 400 conflict and the caller stays anonymous
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg, "An user with that email already exists!");
    assert_eq!(other.session_flags().await, (false, false, false));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    // Given one registered account
    let server = TestServer::start().await.expect("server");
    MockBrowser::new(&server).register("a@x.com", "pw").await;
    let browser = MockBrowser::new(&server);

    // When logging in with an unknown email and with a wrong password
    let unknown = browser.login("nobody@x.com", "pw").await;
    let unknown_status = unknown.status();
    let unknown_body = body_json(unknown).await;

    let wrong = browser.login("a@x.com", "nope").await;
    let wrong_status = wrong.status();
    let wrong_body = body_json(wrong).await;

    // Then both answers are the same 401
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        unknown_body,
        json!({"Success": false, "Msg": "Invalid login details!"})
    );
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(browser.session_flags().await, (false, false, false));
}

#[tokio::test]
async fn test_login_after_logout() {
    // Given a registered account that has logged out
    let server = TestServer::start().await.expect("server");
    let browser = MockBrowser::new(&server);
    browser.register("a@x.com", "pw").await;

    let (status, msg) = status_msg(browser.post("/api/logout").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg, "Successfully logged out!");
    assert_eq!(browser.session_flags().await, (false, false, false));

    // When logging in again
    let (status, msg) = status_msg(browser.login("a@x.com", "pw").await).await;

    // Then the session is authenticated again
    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg, "Successfully logged in!");
    assert_eq!(browser.session_flags().await, (true, true, false));
}

#[tokio::test]
async fn test_change_password() {
    // Given a logged-in password account
    let server = TestServer::start().await.expect("server");
    let browser = MockBrowser::new(&server);
    browser.register("a@x.com", "old").await;

    // When the old password is wrong
    let (status, msg) = status_msg(
        browser
            .post_json(
                "/api/changePassword",
                &json!({"OldPassword": "guess", "NewPassword": "new"}),
            )
            .await,
    )
    .await;

    // Then the change is refused with 401
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(msg, "Wrong old password!");

    // When the old password is right
    let (status, msg) = status_msg(
        browser
            .post_json(
                "/api/changePassword",
                &json!({"OldPassword": "old", "NewPassword": "new"}),
            )
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg, "Password successfully changed!");

    // Then only the new password logs in
    let fresh = MockBrowser::new(&server);
    assert_eq!(
        fresh.login("a@x.com", "old").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(fresh.login("a@x.com", "new").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_authenticated_routes_reject_anonymous_callers() {
    let server = TestServer::start().await.expect("server");
    let browser = MockBrowser::new(&server);

    let responses = [
        browser.get("/api/people").await,
        browser
            .post_json(
                "/api/changePassword",
                &json!({"OldPassword": "a", "NewPassword": "b"}),
            )
            .await,
        browser.post("/api/logout").await,
        browser.delete("/api/google").await,
    ];

    for response in responses {
        let url = response.url().to_string();
        let body = body_json_with_status(response, StatusCode::BAD_REQUEST, &url).await;
        assert_eq!(body["Success"], json!(false), "{url}");
    }
}

#[tokio::test]
async fn test_anonymous_routes_reject_authenticated_callers() {
    // Given a logged-in caller
    let server = TestServer::start().await.expect("server");
    let browser = MockBrowser::new(&server);
    browser.register("a@x.com", "pw").await;

    // When calling login or register again
    let login = browser.login("a@x.com", "pw").await;
    let register = browser.register("b@x.com", "pw").await;

    // Then both are rejected with 400 and nothing is created
    assert_eq!(login.status(), StatusCode::BAD_REQUEST);
    assert_eq!(register.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        MockBrowser::new(&server)
            .login("b@x.com", "pw")
            .await
            .status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_people_for_authenticated_caller() {
    let server = TestServer::start().await.expect("server");
    let browser = MockBrowser::new(&server);
    browser.register("a@x.com", "pw").await;

    let response = browser.get("/api/people").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"People": [
            {"Name": "Jack Hill", "Number": 421},
            {"Name": "Jack Wright", "Number": 212},
        ]})
    );
}

#[tokio::test]
async fn test_authenticated_route_renews_cookie() {
    let server = TestServer::start().await.expect("server");
    let browser = MockBrowser::new(&server);
    browser.register("a@x.com", "pw").await;

    let response = browser.get("/api/people").await;

    let set_cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("renewed cookie");
    assert!(set_cookie.starts_with("SessionId="));
    assert!(set_cookie.contains("HttpOnly"));
}

async fn body_json_with_status(
    response: reqwest::Response,
    expected: StatusCode,
    url: &str,
) -> serde_json::Value {
    assert_eq!(response.status(), expected, "{url}");
    body_json(response).await
}
