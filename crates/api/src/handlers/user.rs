//! Handlers for the authenticated caller's own resources.

use crate::middleware::auth::AuthUser;

/// GET /userinfo
///
/// Protected: the identity arrives from the [`AuthUser`] extractor.
pub async fn user_info(user: AuthUser) -> String {
    tracing::debug!(identity = %user.identity, "Serving user info");
    format!("User info for {}", user.identity)
}
