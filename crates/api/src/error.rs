use axum::http::header::WWW_AUTHENTICATE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use keygate_core::error::CoreError;

use crate::auth::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`AuthError`] and adds HTTP-specific variants.
/// Responses are plain text. Authentication failures are collapsed into a
/// few fixed messages so clients cannot tell which check failed; the
/// precise reason is logged instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level validation error from `keygate_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure from the authentication core.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),

            AppError::Auth(auth) => match auth {
                AuthError::NotFound | AuthError::SecretMismatch => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
                }
                AuthError::DuplicateIdentity(_) => {
                    (StatusCode::CONFLICT, "Identity already registered".to_string())
                }
                AuthError::MissingToken => {
                    return bearer_challenge("Missing token");
                }
                AuthError::Unauthorized(reason) => {
                    tracing::debug!(reason = reason.kind(), "Responding 401 to rejected token");
                    return bearer_challenge("Invalid token");
                }
                AuthError::Store(msg) => {
                    tracing::error!(error = %msg, "Credential store error");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
                }
                AuthError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal auth error");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        (status, message).into_response()
    }
}

/// A 401 carrying a `WWW-Authenticate: Bearer` challenge.
fn bearer_challenge(message: &'static str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, "Bearer")],
        message,
    )
        .into_response()
}
