mod credential_repo;

pub use credential_repo::{is_duplicate_email, CredentialRepo, EMAIL_UNIQUE_CONSTRAINT};
