//! Credential records as seen by the authentication core.

use std::fmt;

use crate::identity::Identity;
use crate::types::{DbId, Timestamp};

/// A stored credential: an identity, its display name, and the stored secret.
///
/// The stored secret is either the plaintext password or an Argon2id PHC
/// string, depending on the secret scheme the server was started with. It is
/// only readable through [`Credential::secret`] and is redacted from `Debug`.
#[derive(Clone)]
pub struct Credential {
    pub id: DbId,
    pub name: String,
    pub identity: Identity,
    secret: String,
    pub created_at: Timestamp,
}

impl Credential {
    pub fn new(
        id: DbId,
        name: String,
        identity: Identity,
        secret: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            identity,
            secret,
            created_at,
        }
    }

    /// The stored secret, in whatever form the secret scheme persisted it.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Input for inserting a credential. `secret` is already in stored form.
#[derive(Clone)]
pub struct NewCredential {
    pub name: String,
    pub identity: Identity,
    pub secret: String,
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Result of a successful insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: DbId,
    pub identity: Identity,
}
