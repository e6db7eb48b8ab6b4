use std::sync::Arc;

use chrono::Duration;
use keygate_core::store::CredentialStore;

use crate::auth::{AccessGuard, Authenticator, TokenCodec};
use crate::config::{ServerConfig, MAX_TOKEN_TTL_HOURS};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Nothing in it is
/// mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Credential store backend (Postgres pool or in-memory map).
    pub store: Arc<dyn CredentialStore>,
    /// Login and registration.
    pub authenticator: Arc<Authenticator>,
    /// Bearer-token verification for protected routes.
    pub guard: AccessGuard,
}

impl AppState {
    /// Wire the auth core from configuration: one codec holding the signing
    /// secret, shared by the authenticator (issue) and the guard (verify).
    ///
    /// The token lifetime is clamped to `1..=MAX_TOKEN_TTL_HOURS`.
    pub fn new(config: ServerConfig, store: Arc<dyn CredentialStore>) -> Self {
        let codec = Arc::new(TokenCodec::new(config.jwt.secret.as_bytes()));
        let authenticator = Arc::new(Authenticator::new(
            Arc::clone(&store),
            Arc::clone(&codec),
            config.secret_scheme,
            Duration::hours(config.jwt.token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS)),
        ));
        let guard = AccessGuard::new(codec);

        Self {
            config: Arc::new(config),
            store,
            authenticator,
            guard,
        }
    }
}
