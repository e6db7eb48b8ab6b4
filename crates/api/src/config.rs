use std::fmt;

use std::str::FromStr;

use axum::http::HeaderValue;
use sqlx::postgres::PgConnectOptions;

use crate::auth::authenticator::DEFAULT_TOKEN_TTL_HOURS;
use crate::auth::SecretScheme;

/// Default connection pool size for the Postgres store.
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Default Postgres port when only `DB_*` parts are given.
const DEFAULT_DB_PORT: u16 = 5432;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Token signing configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours (default: 24, at most [`MAX_TOKEN_TTL_HOURS`]).
    pub token_ttl_hours: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

/// Which credential store backend to run against.
#[derive(Clone)]
pub enum StoreConfig {
    Postgres {
        connect: PgConnectOptions,
        max_connections: u32,
    },
    Memory,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres {
                connect,
                max_connections,
            } => f
                .debug_struct("Postgres")
                .field("host", &connect.get_host())
                .field("port", &connect.get_port())
                .field("database", &connect.get_database())
                .field("password", &"<redacted>")
                .field("max_connections", max_connections)
                .finish(),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except `JWT_SECRET` has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Token configuration (secret, lifetime).
    pub jwt: JwtConfig,
    /// How credential secrets are stored (default: `argon2`).
    pub secret_scheme: SecretScheme,
    /// Credential store backend.
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `JWT_SECRET`           | **required**               |
    /// | `JWT_TTL_HOURS`        | `24`                       |
    /// | `SECRET_SCHEME`        | `argon2`                   |
    /// | `DATABASE_URL`         | built from `DB_*`, else in-memory |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", var("PORT"), 8080u16)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                reason: format!("'{origin}': {e}"),
            })?;
        }

        let request_timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 30u64)?;

        let secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let token_ttl_hours = parse_or("JWT_TTL_HOURS", var("JWT_TTL_HOURS"), DEFAULT_TOKEN_TTL_HOURS)?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            return Err(ConfigError::Invalid {
                var: "JWT_TTL_HOURS",
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_HOURS} hours"),
            });
        }

        let secret_scheme = match var("SECRET_SCHEME") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "SECRET_SCHEME",
                reason,
            })?,
            None => SecretScheme::default(),
        };

        let max_connections = parse_or(
            "DB_MAX_CONNECTIONS",
            var("DB_MAX_CONNECTIONS"),
            DEFAULT_DB_MAX_CONNECTIONS,
        )?;
        let connect = match var("DATABASE_URL") {
            Some(url) => Some(PgConnectOptions::from_str(&url).map_err(|e| ConfigError::Invalid {
                var: "DATABASE_URL",
                reason: e.to_string(),
            })?),
            None => connect_options_from_parts(&var)?,
        };
        let store = match connect {
            Some(connect) => StoreConfig::Postgres {
                connect,
                max_connections,
            },
            None => StoreConfig::Memory,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig {
                secret,
                token_ttl_hours,
            },
            secret_scheme,
            store,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Build Postgres connect options from `DB_HOST`, `DB_USER`, `DB_PASSWORD`,
/// `DB_NAME` and optional `DB_PORT`. Host, user and name must all be set,
/// otherwise there is no database configured.
///
/// Parts are passed to the driver as-is, so reserved URL characters in the
/// user or password need no escaping.
fn connect_options_from_parts(
    var: &dyn Fn(&str) -> Option<String>,
) -> Result<Option<PgConnectOptions>, ConfigError> {
    let (Some(host), Some(user), Some(name)) = (var("DB_HOST"), var("DB_USER"), var("DB_NAME"))
    else {
        return Ok(None);
    };
    let port = parse_or("DB_PORT", var("DB_PORT"), DEFAULT_DB_PORT)?;

    let mut connect = PgConnectOptions::new()
        .host(&host)
        .port(port)
        .username(&user)
        .database(&name);
    if let Some(password) = var("DB_PASSWORD") {
        connect = connect.password(&password);
    }
    Ok(Some(connect))
}
