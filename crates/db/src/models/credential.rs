//! Row model for the `credentials` table.

use keygate_core::credential::Credential;
use keygate_core::identity::Identity;
use keygate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `credentials` table.
///
/// Contains the stored secret -- convert with [`CredentialRow::into_credential`]
/// rather than exposing the row.
#[derive(Debug, Clone, FromRow)]
pub struct CredentialRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub secret: String,
    pub created_at: Timestamp,
}

impl CredentialRow {
    /// Convert into the domain type. Returns `None` if the stored email no
    /// longer parses as an [`Identity`] (rows written outside the service).
    pub fn into_credential(self) -> Option<Credential> {
        let identity = Identity::parse(&self.email).ok()?;
        Some(Credential::new(
            self.id,
            self.name,
            identity,
            self.secret,
            self.created_at,
        ))
    }
}
