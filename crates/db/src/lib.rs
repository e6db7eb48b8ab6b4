//! Credential persistence for keygate.
//!
//! - [`create_pool`], [`health_check`], [`run_migrations`] -- Postgres plumbing.
//! - [`repositories::CredentialRepo`] -- SQL for the `credentials` table.
//! - [`PgCredentialStore`] / [`MemoryCredentialStore`] -- the two
//!   [`CredentialStore`](keygate_core::store::CredentialStore) backends.

pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub use memory::MemoryCredentialStore;
pub use pg::PgCredentialStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from parsed connect options.
pub async fn create_pool(
    connect: PgConnectOptions,
    max_connections: u32,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
