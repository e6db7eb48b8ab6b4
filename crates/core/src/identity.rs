//! The user-facing identity (an email address) that authentication is about.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum accepted length of an identity, matching the `credentials.email` column.
pub const MAX_IDENTITY_LEN: usize = 255;

/// A validated email address identifying exactly one credential.
///
/// Construct with [`Identity::parse`]; an `Identity` value is always
/// syntactically valid and lowercase, so downstream code never re-checks it
/// and `Alice@Example.com` and `alice@example.com` are the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Parse and validate an identity. Surrounding whitespace is ignored and
    /// the address is lowercased.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let candidate = raw.trim().to_lowercase();
        if candidate.is_empty() {
            return Err(CoreError::Validation("email must not be empty".into()));
        }
        if candidate.len() > MAX_IDENTITY_LEN {
            return Err(CoreError::Validation(format!(
                "email must be at most {MAX_IDENTITY_LEN} characters"
            )));
        }
        if !candidate.validate_email() {
            return Err(CoreError::Validation(format!(
                "'{candidate}' is not a valid email address"
            )));
        }
        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
