//! Domain types shared by the keygate crates.
//!
//! - [`identity`] -- the validated email [`Identity`](identity::Identity).
//! - [`credential`] -- stored credentials and insert DTOs.
//! - [`store`] -- the [`CredentialStore`](store::CredentialStore) contract.

pub mod credential;
pub mod error;
pub mod identity;
pub mod store;
pub mod types;
