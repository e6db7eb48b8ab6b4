//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use keygate_core::identity::Identity;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication; the verified identity is then an ordinary argument:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> String {
///     format!("hello {}", user.identity)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The identity the presented token was issued to.
    pub identity: Identity,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).map(HeaderValue::as_bytes);
        let identity = state.guard.authorize_bytes(header)?;
        Ok(AuthUser { identity })
    }
}
