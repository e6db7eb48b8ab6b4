//! Repository for the `credentials` table.

use sqlx::PgPool;

use crate::models::credential::CredentialRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, secret, created_at";

/// Name of the unique constraint guarding `credentials.email`.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "uq_credentials_email";

/// Provides the queries behind the Postgres credential store.
pub struct CredentialRepo;

impl CredentialRepo {
    /// Insert a new credential, returning the created row.
    ///
    /// A duplicate email surfaces as a `sqlx::Error::Database` unique
    /// violation on [`EMAIL_UNIQUE_CONSTRAINT`].
    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        secret: &str,
    ) -> Result<CredentialRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO credentials (name, email, secret)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CredentialRow>(&query)
            .bind(name)
            .bind(email)
            .bind(secret)
            .fetch_one(pool)
            .await
    }

    /// Find a credential by email (case-sensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<CredentialRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM credentials WHERE email = $1");
        sqlx::query_as::<_, CredentialRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Count credentials registered under `email` (0 or 1 given the constraint).
    pub async fn count_by_email(pool: &PgPool, email: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM credentials WHERE email = $1")
            .bind(email)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

/// Whether `err` is a unique violation (`23505`) on the email constraint.
pub fn is_duplicate_email(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}
