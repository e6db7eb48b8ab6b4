//! Integration tests for the Postgres credential store.
//!
//! These need a live Postgres reachable through `DATABASE_URL`; run them with
//! `cargo test -p keygate-db -- --ignored`.

use assert_matches::assert_matches;
use keygate_core::credential::NewCredential;
use keygate_core::identity::Identity;
use keygate_core::store::{CredentialStore, StoreError};
use keygate_db::repositories::CredentialRepo;
use keygate_db::PgCredentialStore;
use sqlx::PgPool;

fn new_credential(email: &str, secret: &str) -> NewCredential {
    NewCredential {
        name: "Alice".to_string(),
        identity: Identity::parse(email).unwrap(),
        secret: secret.to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_and_find(pool: PgPool) {
    let store = PgCredentialStore::new(pool);

    let created = store
        .insert(&new_credential("alice@example.com", "pw123"))
        .await
        .expect("insert should succeed");
    assert_eq!(created.identity.as_str(), "alice@example.com");

    let identity = Identity::parse("alice@example.com").unwrap();
    let found = store
        .find_by_identity(&identity)
        .await
        .unwrap()
        .expect("credential should exist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.name, "Alice");
    assert_eq!(found.secret(), "pw123");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_find_unknown_identity(pool: PgPool) {
    let store = PgCredentialStore::new(pool);
    let identity = Identity::parse("nobody@example.com").unwrap();
    assert!(store.find_by_identity(&identity).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_maps_to_duplicate_identity(pool: PgPool) {
    let store = PgCredentialStore::new(pool.clone());
    store
        .insert(&new_credential("dup@example.com", "first"))
        .await
        .unwrap();

    let result = store.insert(&new_credential("dup@example.com", "second")).await;
    assert_matches!(result, Err(StoreError::DuplicateIdentity(_)));

    let count = CredentialRepo::count_by_email(&pool, "dup@example.com")
        .await
        .unwrap();
    assert_eq!(count, 1, "exactly one credential must remain");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_ping(pool: PgPool) {
    let store = PgCredentialStore::new(pool);
    store.ping().await.expect("database should be reachable");
}
