//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use notabook_api::AppState;
use notabook_auth::PasswordHasher;
use notabook_core::config::AppConfig;
use notabook_database::{MemoryStore, Stores};
use notabook_entity::user::{CreateUser, UserRole};

/// Test application context backed by the in-memory store.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Direct handle on the store for fault injection and seeding
    pub store: MemoryStore,
    /// Store bundle sharing `store`
    pub stores: Stores,
}

impl TestApp {
    /// Create a new test application with an admin and a secretary.
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let stores = Stores::memory(store.clone());
        let router =
            notabook_api::build_app(AppState::new(AppConfig::in_memory(), stores.clone()));

        let app = Self {
            router,
            store,
            stores,
        };
        app.create_user("Admin", "admin@test.com", "admin123", UserRole::Admin)
            .await;
        app.create_user(
            "Secretaria",
            "secretaria@test.com",
            "secret123",
            UserRole::Secretary,
        )
        .await;
        app
    }

    /// Insert a user directly into the store.
    pub async fn create_user(&self, name: &str, email: &str, password: &str, role: UserRole) {
        let password_hash = PasswordHasher::new()
            .hash_password(password)
            .expect("Failed to hash password");
        self.stores
            .users
            .create(&CreateUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role,
                active: true,
            })
            .await
            .expect("Failed to create test user");
    }

    /// Login and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Token of the seeded admin.
    pub async fn admin_token(&self) -> String {
        self.login("admin@test.com", "admin123").await
    }

    /// Token of the seeded secretary.
    pub async fn secretary_token(&self) -> String {
        self.login("secretaria@test.com", "secret123").await
    }

    /// Create a client through the API and return its id.
    pub async fn create_client(&self, token: &str, name: &str, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/clients",
                Some(serde_json::json!({ "name": name, "email": email })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("client id")
            .to_string()
    }

    /// Create a one-line note through the API and return the response.
    pub async fn create_note(&self, token: &str, client_id: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/notes",
            Some(serde_json::json!({
                "client_id": client_id,
                "description": "Compra",
                "line_items": [
                    { "article": "CU", "description": "Cobre", "quantity": "1", "unit_price": "10" }
                ]
            })),
            Some(token),
        )
        .await
    }

    /// Make an HTTP request to the test app.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let raw = self.raw_request(method, path, body, token).await;
        let body: Value = serde_json::from_slice(&raw.bytes).unwrap_or(Value::Null);
        TestResponse {
            status: raw.status,
            body,
        }
    }

    /// Make an HTTP request and keep the body and content type unparsed.
    pub async fn raw_request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> RawResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();

        RawResponse {
            status,
            content_type,
            bytes,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Unparsed response from a test request
#[derive(Debug)]
pub struct RawResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Body bytes
    pub bytes: Vec<u8>,
}
