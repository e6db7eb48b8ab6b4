//! Authentication core.
//!
//! - [`codec`] -- HS256 token issuance and verification ([`TokenCodec`]).
//! - [`authenticator`] -- login and registration against the credential store.
//! - [`guard`] -- bearer-token authorization ([`AccessGuard`]).
//! - [`password`] -- secret storage schemes (Argon2id or plaintext).
//! - [`error`] -- the [`AuthError`] taxonomy.

pub mod authenticator;
pub mod codec;
pub mod error;
pub mod guard;
pub mod password;

pub use authenticator::Authenticator;
pub use codec::{Claims, TokenCodec, VerificationError};
pub use error::AuthError;
pub use guard::AccessGuard;
pub use password::SecretScheme;
