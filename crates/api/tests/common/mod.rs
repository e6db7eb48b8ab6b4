#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use keygate_api::auth::SecretScheme;
use keygate_api::config::{JwtConfig, ServerConfig, StoreConfig};
use keygate_api::router::build_app_router;
use keygate_api::state::AppState;
use keygate_db::MemoryCredentialStore;

/// Signing secret used by every test app.
pub const TEST_SECRET: &str = "integration-test-secret-that-is-long-enough";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(secret_scheme: SecretScheme) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            token_ttl_hours: 24,
        },
        secret_scheme,
        store: StoreConfig::Memory,
    }
}

/// Test application plus a handle on its in-memory credential store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCredentialStore>,
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over a fresh in-memory store. Plaintext secrets keep the tests fast; the
/// Argon2 path is covered by [`build_test_app_with`].
pub fn build_test_app() -> TestApp {
    build_test_app_with(SecretScheme::Plaintext)
}

pub fn build_test_app_with(secret_scheme: SecretScheme) -> TestApp {
    let store = Arc::new(MemoryCredentialStore::new());
    let state = AppState::new(test_config(secret_scheme), store.clone());
    TestApp {
        router: build_app_router(state),
        store,
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("router should always produce a response")
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET with a raw `Authorization` header value.
pub async fn get_with_authorization(app: &Router, uri: &str, authorization: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET with `Authorization: Bearer <token>`.
pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    get_with_authorization(app, uri, &format!("Bearer {token}")).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Register a credential through the API, asserting 201.
pub async fn register(app: &Router, email: &str, password: &str) {
    let body = serde_json::json!({ "name": "Test User", "email": email, "password": password });
    let response = post_json(app, "/register", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
}

/// Log in through the API and return the bearer token from the response header.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let header = response
        .headers()
        .get(AUTHORIZATION)
        .expect("login must set the Authorization header")
        .to_str()
        .unwrap();
    header
        .strip_prefix("Bearer ")
        .expect("header must use the Bearer scheme")
        .to_string()
}
