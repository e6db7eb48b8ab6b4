//! Route definitions for protected user resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// ```text
/// GET /userinfo -> user_info (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/userinfo", get(user::user_info))
}
