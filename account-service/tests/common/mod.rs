use std::sync::Arc;

use account_service::domain::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::RouterOptions;
use account_service::outbound::repositories::InMemoryAccountRepository;
use auth::AuthSettings;
use auth::Authenticator;
use auth::KdfParams;
use serde_json::json;

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryAccountRepository>,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
}

pub fn test_settings() -> AuthSettings {
    AuthSettings::new(
        "test-access-secret-for-jwt-signing-at-least-32-bytes",
        "test-refresh-secret-for-jwt-signing-at-least-32-bytes",
        "test-cursor-secret-for-jwt-signing-at-least-32-bytes",
    )
    .with_kdf(KdfParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
        key_length: 32,
    })
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::new());
        let authenticator =
            Arc::new(Authenticator::new(&test_settings()).expect("Invalid test settings"));
        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(
            account_service,
            Arc::clone(&authenticator),
            RouterOptions {
                secure_cookies: false,
                ..RouterOptions::default()
            },
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            authenticator,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account and return its id
    pub async fn register(&self, user_name: &str, password: &str) -> String {
        let response = self
            .post("/api/v1/register")
            .json(&json!({ "userName": user_name, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"]
            .as_str()
            .expect("Missing account id")
            .to_string()
    }

    /// Log in and return (access_token, refresh_token)
    pub async fn login(&self, user_name: &str, password: &str) -> (String, String) {
        let response = self
            .post("/api/v1/login")
            .json(&json!({ "userName": user_name, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        (
            body["data"]["accessToken"].as_str().unwrap().to_string(),
            body["data"]["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}
