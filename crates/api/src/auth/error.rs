//! Error taxonomy of the authentication core.

use keygate_core::identity::Identity;
use keygate_core::store::StoreError;

use super::codec::VerificationError;

/// Failures of the authenticator and the access guard.
///
/// Every variant is request-scoped. The HTTP layer collapses them into a few
/// client-visible responses; the precise variant is kept for logging.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credential is registered under the presented identity.
    #[error("no credential registered for identity")]
    NotFound,

    /// The presented secret does not match the stored one.
    #[error("presented secret does not match")]
    SecretMismatch,

    /// Registration attempted for an identity that already exists.
    #[error("identity already registered: {0}")]
    DuplicateIdentity(Identity),

    /// No bearer token in the request.
    #[error("missing bearer token")]
    MissingToken,

    /// A token was presented but failed verification.
    #[error("unauthorized: {0}")]
    Unauthorized(#[source] VerificationError),

    /// The credential store failed.
    #[error("credential store failure: {0}")]
    Store(String),

    /// Token or secret processing failed unexpectedly.
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateIdentity(identity) => Self::DuplicateIdentity(identity),
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}

impl From<VerificationError> for AuthError {
    fn from(err: VerificationError) -> Self {
        Self::Unauthorized(err)
    }
}
