//! Handlers for registration and login.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, StatusCode};
use axum::Json;
use keygate_core::identity::Identity;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /register`.
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "name must be at most 255 characters"))]
    pub name: String,
    pub email: String,
    #[validate(length(min = 1, max = 1024, message = "password must be 1-1024 characters"))]
    pub password: String,
}

/// Request body for `POST /login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /register
///
/// Create a credential. Returns 201 Created with an empty body.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(input) = payload.map_err(invalid_input)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let identity = Identity::parse(&input.email)?;

    state
        .authenticator
        .register(input.name.trim().to_string(), identity, &input.password)
        .await?;

    Ok(StatusCode::CREATED)
}

/// POST /login
///
/// Authenticate with email + password. On success the token is returned in
/// the `Authorization: Bearer <token>` response header.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1])> {
    let Json(input) = payload.map_err(invalid_input)?;
    let identity = Identity::parse(&input.email)?;

    let token = state.authenticator.login(&identity, &input.password).await?;

    Ok((StatusCode::OK, [(AUTHORIZATION, format!("Bearer {token}"))]))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_input(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    AppError::BadRequest("Invalid input".into())
}
