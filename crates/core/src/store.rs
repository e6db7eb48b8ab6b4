//! The credential store contract used by the authentication core.
//!
//! The core only ever looks a credential up by identity or inserts a new one.
//! Storage engines (Postgres, in-memory) live in `keygate-db` and implement
//! [`CredentialStore`]; the core never assumes which one it is talking to.

use async_trait::async_trait;

use crate::credential::{Created, Credential, NewCredential};
use crate::identity::Identity;

/// Errors surfaced by a [`CredentialStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The identity is already registered (uniqueness invariant).
    #[error("identity already registered: {0}")]
    DuplicateIdentity(Identity),

    /// The backing storage failed; the message is for logs only.
    #[error("credential store failure: {0}")]
    Backend(String),
}

/// Read/insert access to credential records, keyed by [`Identity`].
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up the credential registered under `identity`.
    async fn find_by_identity(&self, identity: &Identity)
        -> Result<Option<Credential>, StoreError>;

    /// Insert a new credential, failing with [`StoreError::DuplicateIdentity`]
    /// when the identity already exists.
    async fn insert(&self, credential: &NewCredential) -> Result<Created, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
