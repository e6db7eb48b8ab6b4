//! In-memory [`CredentialStore`] for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use keygate_core::credential::{Created, Credential, NewCredential};
use keygate_core::identity::Identity;
use keygate_core::store::{CredentialStore, StoreError};
use keygate_core::types::DbId;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: DbId,
    by_identity: HashMap<Identity, Credential>,
}

/// Process-local credential map. Contents are lost on restart.
///
/// The uniqueness check and the insert happen under one write lock, so two
/// concurrent registrations of the same identity cannot both succeed.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Inner>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_identity.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<Credential>, StoreError> {
        Ok(self.inner.read().await.by_identity.get(identity).cloned())
    }

    async fn insert(&self, credential: &NewCredential) -> Result<Created, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.by_identity.contains_key(&credential.identity) {
            return Err(StoreError::DuplicateIdentity(credential.identity.clone()));
        }

        inner.next_id += 1;
        let id = inner.next_id;
        let stored = Credential::new(
            id,
            credential.name.clone(),
            credential.identity.clone(),
            credential.secret.clone(),
            chrono::Utc::now(),
        );
        inner.by_identity.insert(credential.identity.clone(), stored);

        Ok(Created {
            id,
            identity: credential.identity.clone(),
        })
    }
}
