//! Credential verification and registration.

use std::sync::Arc;

use chrono::Duration;
use keygate_core::credential::{Created, NewCredential};
use keygate_core::identity::Identity;
use keygate_core::store::CredentialStore;

use super::codec::TokenCodec;
use super::error::AuthError;
use super::password::SecretScheme;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Checks presented credentials against the store and issues tokens.
///
/// Holds only shared, immutable handles, so one instance serves every
/// concurrent request.
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    codec: Arc<TokenCodec>,
    scheme: SecretScheme,
    token_ttl: Duration,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        codec: Arc<TokenCodec>,
        scheme: SecretScheme,
        token_ttl: Duration,
    ) -> Self {
        scheme.prepare_decoy();
        Self {
            store,
            codec,
            scheme,
            token_ttl,
        }
    }

    /// Verify `presented_secret` for `identity` and issue a token.
    ///
    /// Performs exactly one store read and never writes. An unknown identity
    /// still pays for one secret comparison, against a decoy.
    pub async fn login(&self, identity: &Identity, presented_secret: &str) -> Result<String, AuthError> {
        let Some(credential) = self.store.find_by_identity(identity).await? else {
            self.scheme.match_decoy(presented_secret);
            tracing::info!(identity = %identity, reason = "not_found", "Login rejected");
            return Err(AuthError::NotFound);
        };

        let matches = self
            .scheme
            .matches(presented_secret, credential.secret())
            .map_err(|e| {
                tracing::error!(
                    identity = %identity,
                    scheme = %self.scheme,
                    error = %e,
                    "Stored secret is unusable under the configured scheme"
                );
                AuthError::Internal(format!("Secret verification error: {e}"))
            })?;

        if !matches {
            tracing::warn!(identity = %identity, reason = "secret_mismatch", "Login rejected");
            return Err(AuthError::SecretMismatch);
        }

        let token = self
            .codec
            .issue(identity, self.token_ttl)
            .map_err(|e| AuthError::Internal(format!("Token generation error: {e}")))?;

        tracing::info!(identity = %identity, "Login succeeded");
        Ok(token)
    }

    /// Register a new credential, sealing the secret with the configured scheme.
    pub async fn register(
        &self,
        name: String,
        identity: Identity,
        secret: &str,
    ) -> Result<Created, AuthError> {
        let sealed = self
            .scheme
            .seal(secret)
            .map_err(|e| AuthError::Internal(format!("Secret hashing error: {e}")))?;

        let input = NewCredential {
            name,
            identity,
            secret: sealed,
        };

        match self.store.insert(&input).await {
            Ok(created) => {
                tracing::info!(identity = %created.identity, id = created.id, "Credential registered");
                Ok(created)
            }
            Err(e) => {
                let err = AuthError::from(e);
                if let AuthError::DuplicateIdentity(identity) = &err {
                    tracing::info!(identity = %identity, "Registration rejected: duplicate identity");
                }
                Err(err)
            }
        }
    }
}
