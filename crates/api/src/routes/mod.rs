pub mod auth;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// ```text
/// POST /register     register (public)
/// POST /login        login (public)
/// GET  /userinfo     caller's info (requires auth)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new().merge(auth::router()).merge(user::router())
}
