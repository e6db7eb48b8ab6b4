//! Integration tests for registration, login, and the protected user-info route.
//!
//! Every test runs the full router over a fresh in-memory credential store.

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use common::{body_text, build_test_app, get, get_auth, get_with_authorization, post_json};
use keygate_api::auth::{SecretScheme, TokenCodec};
use keygate_core::identity::Identity;
use keygate_core::store::CredentialStore;
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: register -> login -> userinfo happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_login_and_fetch_user_info() {
    let app = build_test_app();

    common::register(&app.router, "alice@example.com", "s3cret").await;
    let token = common::login(&app.router, "alice@example.com", "s3cret").await;

    let response = get_auth(&app.router, "/userinfo", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "User info for alice@example.com");
}

// ---------------------------------------------------------------------------
// Test: Argon2-sealed secrets work end to end and are never stored in clear
// ---------------------------------------------------------------------------

#[tokio::test]
async fn argon2_scheme_round_trip() {
    let app = common::build_test_app_with(SecretScheme::Argon2);

    common::register(&app.router, "bob@example.com", "hunter2").await;

    let identity = Identity::parse("bob@example.com").unwrap();
    let stored = app.store.find_by_identity(&identity).await.unwrap().unwrap();
    assert_ne!(stored.secret(), "hunter2");
    assert!(stored.secret().starts_with("$argon2"));

    let token = common::login(&app.router, "bob@example.com", "hunter2").await;
    let response = get_auth(&app.router, "/userinfo", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Registration failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_registration_returns_409_and_keeps_one_credential() {
    let app = build_test_app();
    common::register(&app.router, "carol@example.com", "first").await;

    let body = json!({ "name": "Carol", "email": "carol@example.com", "password": "second" });
    let response = post_json(&app.router, "/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.store.len().await, 1);

    // The original secret still works; the second one never took effect.
    common::login(&app.router, "carol@example.com", "first").await;
}

#[tokio::test]
async fn register_with_invalid_email_returns_400() {
    let app = build_test_app();

    let body = json!({ "name": "Nobody", "email": "not-an-email", "password": "pw" });
    let response = post_json(&app.router, "/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn register_with_empty_password_returns_400() {
    let app = build_test_app();

    let body = json!({ "email": "dave@example.com", "password": "" });
    let response = post_json(&app.router, "/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn register_with_missing_fields_returns_400() {
    let app = build_test_app();

    let response = post_json(&app.router, "/register", json!({ "name": "x" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid input");
}

// ---------------------------------------------------------------------------
// Login failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_wrong_password_returns_401_without_token() {
    let app = build_test_app();
    common::register(&app.router, "erin@example.com", "right").await;

    let body = json!({ "email": "erin@example.com", "password": "wrong" });
    let response = post_json(&app.router, "/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(AUTHORIZATION).is_none());
    assert_eq!(body_text(response).await, "Invalid credentials");
}

#[tokio::test]
async fn login_with_unknown_identity_looks_like_wrong_password() {
    let app = build_test_app();

    let body = json!({ "email": "ghost@example.com", "password": "anything" });
    let response = post_json(&app.router, "/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(AUTHORIZATION).is_none());
    assert_eq!(body_text(response).await, "Invalid credentials");
}

#[tokio::test]
async fn login_with_malformed_body_returns_400() {
    let app = build_test_app();

    let response = post_json(&app.router, "/login", json!({ "email": 42 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn concurrent_logins_all_succeed() {
    let app = build_test_app();
    common::register(&app.router, "frank@example.com", "pw").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            common::login(&router, "frank@example.com", "pw").await
        }));
    }

    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.unwrap());
    }

    // Every token carries a fresh id, so no two are identical.
    tokens.sort();
    tokens.dedup();
    assert_eq!(tokens.len(), 8);
    assert_eq!(app.store.len().await, 1);
}

// ---------------------------------------------------------------------------
// Protected route rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn user_info_without_token_returns_401_missing_token() {
    let app = build_test_app();

    let response = get(&app.router, "/userinfo").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
    assert_eq!(body_text(response).await, "Missing token");
}

#[tokio::test]
async fn user_info_with_empty_bearer_returns_401_missing_token() {
    let app = build_test_app();

    let response = get_with_authorization(&app.router, "/userinfo", "Bearer ").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Missing token");
}

#[tokio::test]
async fn user_info_with_garbage_token_returns_401_invalid_token() {
    let app = build_test_app();

    let response = get_auth(&app.router, "/userinfo", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
    assert_eq!(body_text(response).await, "Invalid token");
}

#[tokio::test]
async fn user_info_with_expired_token_returns_401() {
    let app = build_test_app();
    let codec = TokenCodec::new(common::TEST_SECRET.as_bytes());
    let identity = Identity::parse("alice@example.com").unwrap();

    let two_days_ago = (Utc::now() - Duration::days(2)).timestamp();
    let token = codec
        .issue_at(&identity, Duration::hours(24), two_days_ago)
        .unwrap();

    let response = get_auth(&app.router, "/userinfo", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid token");
}

#[tokio::test]
async fn user_info_with_token_from_another_secret_returns_401() {
    let app = build_test_app();
    let foreign = TokenCodec::new(b"some-other-deployment-secret");
    let identity = Identity::parse("alice@example.com").unwrap();
    let token = foreign.issue(&identity, Duration::hours(1)).unwrap();

    let response = get_auth(&app.router, "/userinfo", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid token");
}

#[tokio::test]
async fn user_info_with_tampered_token_returns_401() {
    let app = build_test_app();
    common::register(&app.router, "gina@example.com", "pw").await;
    let token = common::login(&app.router, "gina@example.com", "pw").await;

    let mut bytes = token.into_bytes();
    let i = bytes.len() - 5;
    bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(bytes).unwrap();

    let response = get_auth(&app.router, "/userinfo", &tampered).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid token");
}

#[tokio::test]
async fn user_info_accepts_bare_token_and_lowercase_scheme() {
    let app = build_test_app();
    common::register(&app.router, "hank@example.com", "pw").await;
    let token = common::login(&app.router, "hank@example.com", "pw").await;

    let bare = get_with_authorization(&app.router, "/userinfo", &token).await;
    assert_eq!(bare.status(), StatusCode::OK);

    let lower = get_with_authorization(&app.router, "/userinfo", &format!("bearer {token}")).await;
    assert_eq!(lower.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_info_with_non_ascii_header_returns_401_invalid_token() {
    let app = build_test_app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/userinfo")
        .header(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap())
        .body(Body::empty())
        .unwrap();

    let response = common::send(&app.router, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid token");
}

// ---------------------------------------------------------------------------
// Identities are case-insensitive
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registration_is_case_insensitive() {
    let app = build_test_app();
    common::register(&app.router, "Ivy@Example.com", "pw").await;

    let body = json!({ "email": "ivy@example.COM", "password": "other" });
    let response = post_json(&app.router, "/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn login_ignores_email_case() {
    let app = build_test_app();
    common::register(&app.router, "Jack@Example.com", "pw").await;

    let token = common::login(&app.router, "JACK@example.com", "pw").await;

    let response = get_auth(&app.router, "/userinfo", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "User info for jack@example.com");
}
