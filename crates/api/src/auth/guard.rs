//! Bearer-token gate for protected operations.

use std::sync::Arc;

use chrono::Utc;
use keygate_core::identity::Identity;

use super::codec::{TokenCodec, VerificationError};
use super::error::AuthError;

/// Authentication scheme expected in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Verifies bearer tokens and yields the identity they were issued to.
///
/// Authorization is a pure function of the header, the current time, and the
/// codec's secret: the guard never touches the credential store.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    codec: Arc<TokenCodec>,
}

impl AccessGuard {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Authorize a request from its raw `Authorization` header value.
    pub fn authorize(&self, raw_header: Option<&str>) -> Result<Identity, AuthError> {
        self.authorize_at(raw_header, Utc::now().timestamp())
    }

    /// Authorize from the raw header bytes. A value that is not valid text
    /// is rejected as a malformed token.
    pub fn authorize_bytes(&self, raw_header: Option<&[u8]>) -> Result<Identity, AuthError> {
        match raw_header.map(std::str::from_utf8) {
            Some(Err(_)) => Err(reject(VerificationError::MalformedToken)),
            Some(Ok(raw)) => self.authorize(Some(raw)),
            None => self.authorize(None),
        }
    }

    /// Authorize as if the current time were `now` (Unix seconds).
    pub fn authorize_at(&self, raw_header: Option<&str>, now: i64) -> Result<Identity, AuthError> {
        let token = raw_header.map(strip_bearer).unwrap_or_default();
        if token.is_empty() {
            tracing::debug!("Rejected request without bearer token");
            return Err(AuthError::MissingToken);
        }

        let claims = self.codec.verify_at(token, now).map_err(reject)?;

        // Tokens are only issued for parsed identities; a subject that does
        // not parse was not minted by this codec's issue path.
        Identity::parse(claims.subject()).map_err(|_| reject(VerificationError::MalformedToken))
    }
}

fn reject(err: VerificationError) -> AuthError {
    tracing::debug!(reason = err.kind(), "Rejected bearer token");
    AuthError::Unauthorized(err)
}

/// Strip a case-insensitive `Bearer` scheme prefix. A value without the
/// prefix is returned trimmed, unchanged otherwise.
fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.get(..BEARER_SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => {
            let rest = &raw[BEARER_SCHEME.len()..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim()
            } else {
                raw
            }
        }
        _ => raw,
    }
}
