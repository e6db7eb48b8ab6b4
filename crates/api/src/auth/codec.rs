//! Signed-token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying a [`Claims`] payload. The codec owns
//! the signing secret; it is built once at startup and shared read-only, so
//! issue and verify always agree on the key and algorithm.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use keygate_core::identity::Identity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The only signing algorithm the codec issues or accepts.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims embedded in every token.
///
/// Fields are private: a `Claims` value is only produced by the codec, and
/// `exp > iat` holds for every value it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the identity (email) the token was issued to.
    sub: String,
    /// Issued-at time (UTC Unix timestamp).
    iat: i64,
    /// Expiration time (UTC Unix timestamp).
    exp: i64,
    /// Unique token identifier (UUID v4) for audit.
    jti: String,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    pub fn expires_at(&self) -> i64 {
        self.exp
    }

    pub fn token_id(&self) -> &str {
        &self.jti
    }
}

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    /// Not a three-segment JWT, undecodable, missing claims, or a foreign algorithm.
    #[error("malformed token")]
    MalformedToken,
    /// The signature does not match the header and payload under our secret.
    #[error("token signature mismatch")]
    SignatureMismatch,
    /// The current time is at or past the token's expiration.
    #[error("token expired")]
    Expired,
}

impl VerificationError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedToken => "malformed_token",
            Self::SignatureMismatch => "signature_mismatch",
            Self::Expired => "expired",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::SignatureMismatch,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::MalformedToken,
        }
    }
}

/// Issues and verifies tokens under one fixed secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked in `verify_at` with `now >= exp` and no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `identity` valid for `ttl` from now.
    pub fn issue(
        &self,
        identity: &Identity,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(identity, ttl, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    ///
    /// TTLs shorter than one second are rounded up to one second.
    pub fn issue_at(
        &self,
        identity: &Identity,
        ttl: Duration,
        now: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: identity.as_str().to_string(),
            iat: now,
            exp: now.saturating_add(ttl.num_seconds().max(1)),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding)
    }

    /// Verify `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify `token` as if the current time were `now` (Unix seconds).
    ///
    /// Structure and signature are checked before expiry, so a forged token
    /// is reported as such even when it is also expired.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, VerificationError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)?.claims;

        if claims.exp <= claims.iat {
            return Err(VerificationError::MalformedToken);
        }
        if now >= claims.exp {
            return Err(VerificationError::Expired);
        }
        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("secret", &"<redacted>")
            .finish()
    }
}
