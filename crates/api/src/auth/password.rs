//! How credential secrets are stored and compared.
//!
//! Two schemes exist. [`SecretScheme::Argon2`] stores Argon2id PHC strings
//! with a random salt from [`OsRng`], so the algorithm parameters and salt
//! travel with the hash. [`SecretScheme::Plaintext`] stores the password as
//! given and compares by equality; it exists for compatibility with stores
//! written that way and is never the default.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Known secret behind the decoy hash. Never stored.
const DECOY_SECRET: &str = "keygate-decoy-secret";

/// Argon2id hash verified against when no credential exists for an identity.
static DECOY_HASH: OnceLock<Option<String>> = OnceLock::new();

fn decoy_hash() -> Option<&'static str> {
    DECOY_HASH
        .get_or_init(|| match hash_password(DECOY_SECRET) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::error!(error = %e, "Failed to prepare decoy hash");
                None
            }
        })
        .as_deref()
}

#[cfg(test)]
thread_local! {
    static VERIFY_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Argon2 verifications performed on the current thread.
#[cfg(test)]
pub(crate) fn verify_calls() -> usize {
    VERIFY_CALLS.with(|calls| calls.get())
}

/// Storage form for credential secrets, fixed for the life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecretScheme {
    #[default]
    Argon2,
    Plaintext,
}

impl SecretScheme {
    /// Turn a presented password into the form persisted in the store.
    pub fn seal(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        match self {
            Self::Argon2 => hash_password(password),
            Self::Plaintext => Ok(password.to_string()),
        }
    }

    /// Compare a presented password with a stored secret.
    ///
    /// `Err` means the stored value is unusable under this scheme (for example
    /// a plaintext row read with the Argon2 scheme), not a wrong password.
    pub fn matches(&self, password: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
        match self {
            Self::Argon2 => verify_password(password, stored),
            Self::Plaintext => Ok(password == stored),
        }
    }

    /// Compare `password` against a decoy secret and discard the result.
    ///
    /// Used when no credential exists, so an unknown identity costs the same
    /// as a wrong password under this scheme.
    pub fn match_decoy(&self, password: &str) {
        match self {
            Self::Argon2 => {
                if let Some(hash) = decoy_hash() {
                    let _ = verify_password(password, hash);
                }
            }
            Self::Plaintext => {
                let _ = std::hint::black_box(password == DECOY_SECRET);
            }
        }
    }

    /// Compute the decoy hash now rather than on the first unknown identity.
    pub fn prepare_decoy(&self) {
        if *self == Self::Argon2 {
            decoy_hash();
        }
    }
}

impl FromStr for SecretScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argon2" | "argon2id" => Ok(Self::Argon2),
            "plaintext" | "plain" => Ok(Self::Plaintext),
            other => Err(format!(
                "unknown secret scheme '{other}' (expected 'argon2' or 'plaintext')"
            )),
        }
    }
}

impl fmt::Display for SecretScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argon2 => f.write_str("argon2"),
            Self::Plaintext => f.write_str("plaintext"),
        }
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    #[cfg(test)]
    VERIFY_CALLS.with(|calls| calls.set(calls.get() + 1));

    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
