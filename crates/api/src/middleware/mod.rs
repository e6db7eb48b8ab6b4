//! Request extractors that gate handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated identity from a Bearer token.

pub mod auth;
