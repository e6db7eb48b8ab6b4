//! Postgres-backed [`CredentialStore`].

use async_trait::async_trait;
use keygate_core::credential::{Created, Credential, NewCredential};
use keygate_core::identity::Identity;
use keygate_core::store::{CredentialStore, StoreError};

use crate::repositories::{is_duplicate_email, CredentialRepo};
use crate::DbPool;

/// Credential store over a shared connection pool.
///
/// The pool is created once at startup and cloned (cheaply) into the store;
/// every call borrows a pooled connection rather than opening a new one.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: DbPool,
}

impl PgCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<Credential>, StoreError> {
        let row = CredentialRepo::find_by_email(&self.pool, identity.as_str())
            .await
            .map_err(backend)?;

        Ok(row.and_then(|row| {
            let id = row.id;
            let credential = row.into_credential();
            if credential.is_none() {
                tracing::warn!(credential_id = id, "Stored email is not a valid identity");
            }
            credential
        }))
    }

    async fn insert(&self, credential: &NewCredential) -> Result<Created, StoreError> {
        let row = CredentialRepo::create(
            &self.pool,
            &credential.name,
            credential.identity.as_str(),
            &credential.secret,
        )
        .await
        .map_err(|e| {
            if is_duplicate_email(&e) {
                StoreError::DuplicateIdentity(credential.identity.clone())
            } else {
                backend(e)
            }
        })?;

        Ok(Created {
            id: row.id,
            identity: credential.identity.clone(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(backend)
    }
}
