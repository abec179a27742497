mod common;

use account_service::domain::account::models::AccountId;
use auth::TokenPurpose;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/health")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"], "OK");
    assert_eq!(body["status_code"], 200);
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/register")
        .json(&json!({
            "userName": "nicola@example.com",
            "password": "pass_word!",
            "name": "Nicola",
            "gender": "male"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["userName"], "nicola@example.com");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["createdAt"].is_string());

    let id: AccountId = body["data"]["id"].as_str().unwrap().parse().unwrap();
    let profile = app.repository.profile(&id).unwrap().expect("Missing profile");
    assert_eq!(profile.name.as_deref(), Some("Nicola"));
}

#[tokio::test]
async fn test_register_duplicate_user_name() {
    let app = TestApp::spawn().await;
    app.register("nicola@example.com", "pass_word!").await;

    let response = app
        .post("/api/v1/register")
        .json(&json!({ "userName": "nicola@example.com", "password": "other" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "user existed");
}

#[tokio::test]
async fn test_register_invalid_fields() {
    let app = TestApp::spawn().await;

    for payload in [
        json!({ "userName": "nicola", "password": "pass_word!" }),
        json!({ "userName": "nicola@example.com", "password": "" }),
        json!({ "userName": "nicola@example.com", "password": "pw", "gender": "robot" }),
        json!({ "userName": "nicola@example.com", "password": "pw", "phone": "12-34" }),
    ] {
        let response = app
            .post("/api/v1/register")
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", payload);
    }
}

#[tokio::test]
async fn test_reregister_deactivated_account_takes_new_password() {
    let app = TestApp::spawn().await;
    let id: AccountId = app
        .register("nicola@example.com", "old_password")
        .await
        .parse()
        .unwrap();
    app.repository.deactivate(&id).unwrap();

    let reactivated = app.register("nicola@example.com", "new_password").await;
    assert_eq!(reactivated, id.to_string());

    let response = app
        .post("/api/v1/login")
        .json(&json!({ "userName": "nicola@example.com", "password": "old_password" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    app.login("nicola@example.com", "new_password").await;
}

#[tokio::test]
async fn test_login_sets_cookies_and_returns_tokens() {
    let app = TestApp::spawn().await;
    let id = app.register("nicola@example.com", "pass_word!").await;

    let response = app
        .post("/api/v1/login")
        .json(&json!({ "userName": "nicola@example.com", "password": "pass_word!" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let cookies: Vec<(String, bool)> = response
        .cookies()
        .map(|c| (c.name().to_string(), c.http_only()))
        .collect();
    assert!(cookies.contains(&("accessToken".to_string(), true)));
    assert!(cookies.contains(&("refreshToken".to_string(), true)));

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let access_token = body["data"]["accessToken"].as_str().unwrap();
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap();
    assert_ne!(access_token, refresh_token);

    let claims = app
        .authenticator
        .validate_token(access_token, TokenPurpose::Access)
        .expect("Access token should validate");
    assert_eq!(claims.sub, id);
    let claims = app
        .authenticator
        .validate_token(refresh_token, TokenPurpose::Refresh)
        .expect("Refresh token should validate");
    assert_eq!(claims.sub, id);
}

#[tokio::test]
async fn test_login_invalid_identifier() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/login")
        .json(&json!({ "userName": "test", "password": "pass_word!" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_missing_password_is_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/login")
        .json(&json!({ "userName": "nicola@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 400);
    assert!(body["data"]["message"].is_string());
}

#[tokio::test]
async fn test_register_missing_password_is_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/register")
        .json(&json!({ "userName": "nicola@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 400);
    assert!(body["data"]["message"].is_string());
}

#[tokio::test]
async fn test_login_unknown_user_and_wrong_password_look_the_same() {
    let app = TestApp::spawn().await;
    app.register("nicola@example.com", "pass_word!").await;

    let wrong_password = app
        .post("/api/v1/login")
        .json(&json!({ "userName": "nicola@example.com", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();

    let unknown = app
        .post("/api/v1/login")
        .json(&json!({ "userName": "ghost@example.com", "password": "pass_word!" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown: serde_json::Value = unknown.json().await.unwrap();

    assert_eq!(wrong_password, unknown);
}

#[tokio::test]
async fn test_refresh_with_body() {
    let app = TestApp::spawn().await;
    app.register("nicola@example.com", "pass_word!").await;
    let (_, refresh_token) = app.login("nicola@example.com", "pass_word!").await;

    let response = app
        .post("/api/v1/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.cookies().any(|c| c.name() == "accessToken"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let access_token = body["data"]["accessToken"].as_str().unwrap();
    app.authenticator
        .validate_token(access_token, TokenPurpose::Access)
        .expect("Refreshed token should be an access token");
}

#[tokio::test]
async fn test_refresh_with_cookie() {
    let app = TestApp::spawn().await;
    app.register("nicola@example.com", "pass_word!").await;
    app.login("nicola@example.com", "pass_word!").await;

    let response = app
        .post("/api/v1/refresh")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::spawn().await;
    app.register("nicola@example.com", "pass_word!").await;
    let (access_token, _) = app.login("nicola@example.com", "pass_word!").await;

    let response = app
        .post("/api/v1/refresh")
        .json(&json!({ "refreshToken": access_token }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_after_deactivation() {
    let app = TestApp::spawn().await;
    let id: AccountId = app
        .register("nicola@example.com", "pass_word!")
        .await
        .parse()
        .unwrap();
    let (_, refresh_token) = app.login("nicola@example.com", "pass_word!").await;

    app.repository.deactivate(&id).unwrap();

    let response = app
        .post("/api/v1/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_accepts_only_access_tokens() {
    let app = TestApp::spawn().await;
    let id = app.register("nicola@example.com", "pass_word!").await;
    let (access_token, refresh_token) = app.login("nicola@example.com", "pass_word!").await;

    let response = app
        .get_authenticated("/api/v1/session", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["accountId"], id);
    assert!(body["data"]["expiresAt"].is_string());

    let response = app
        .get_authenticated("/api/v1/session", &refresh_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_reads_access_cookie() {
    let app = TestApp::spawn().await;
    app.register("nicola@example.com", "pass_word!").await;
    app.login("nicola@example.com", "pass_word!").await;

    let response = app
        .get("/api/v1/session")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}
