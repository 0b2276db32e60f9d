//! Token signing and token transport configuration

use serde::{Deserialize, Serialize};

use super::{env_flag, env_or, env_string, ConfigError};

/// Default access token lifetime (30 minutes)
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// Default refresh token lifetime (1 day)
pub const DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS: i64 = 1;

/// Longest token string accepted for verification, in characters
pub const DEFAULT_MAX_TOKEN_LENGTH: usize = 2048;

/// JWT signing configuration
///
/// Has no `Default`; the signing secret must always be supplied.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric signing secret
    pub secret: String,

    /// Signing algorithm name (HS256, HS384 or HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Access token lifetime in minutes
    #[serde(default = "default_access_minutes")]
    pub access_token_expire_minutes: i64,

    /// Refresh token lifetime in days
    #[serde(default = "default_refresh_days")]
    pub refresh_token_expire_days: i64,

    /// Tokens with more characters than this are rejected before decoding
    #[serde(default = "default_max_token_length")]
    pub max_token_length: usize,
}

impl JwtConfig {
    /// Create a configuration with the given secret and default lifetimes
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: default_algorithm(),
            access_token_expire_minutes: DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            refresh_token_expire_days: DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS,
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
        }
    }

    /// Load from `JWT_SECRET_KEY`, `JWT_ALGORITHM`, `ACCESS_TOKEN_EXPIRE_MINUTES`,
    /// `REFRESH_TOKEN_EXPIRE_DAYS` and `MAX_TOKEN_LENGTH`
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env_string("JWT_SECRET_KEY")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing { key: "JWT_SECRET_KEY" })?;

        Ok(Self {
            secret,
            algorithm: env_string("JWT_ALGORITHM").unwrap_or_else(default_algorithm),
            access_token_expire_minutes: env_or(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            )?,
            refresh_token_expire_days: env_or(
                "REFRESH_TOKEN_EXPIRE_DAYS",
                DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS,
            )?,
            max_token_length: env_or("MAX_TOKEN_LENGTH", DEFAULT_MAX_TOKEN_LENGTH)?,
        })
    }

    /// Set access token lifetime in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }

    /// Set refresh token lifetime in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expire_days = days;
        self
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expire_minutes * 60
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.refresh_token_expire_days * 86400
    }
}

/// How tokens travel between client and server
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Cookie mode when true, `Authorization: Bearer` header mode otherwise
    pub use_cookie_auth: bool,

    /// Cookie carrying the access token
    pub cookie_access_name: String,

    /// Cookie carrying the refresh token
    pub cookie_refresh_name: String,

    /// Cookie domain attribute
    #[serde(default)]
    pub cookie_domain: Option<String>,

    /// Cookie secure flag (HTTPS only)
    pub cookie_secure: bool,

    /// Cookie HttpOnly flag
    #[serde(default = "default_http_only")]
    pub cookie_http_only: bool,

    /// Cookie SameSite attribute ("Strict", "Lax" or "None")
    pub cookie_same_site: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            use_cookie_auth: true,
            cookie_access_name: String::from("access_token"),
            cookie_refresh_name: String::from("refresh_token"),
            cookie_domain: None,
            cookie_secure: false, // Set to true in production
            cookie_http_only: default_http_only(),
            cookie_same_site: String::from("Lax"),
        }
    }
}

impl TransportConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            use_cookie_auth: env_flag("USE_COOKIE_AUTH", defaults.use_cookie_auth),
            cookie_access_name: env_string("COOKIE_ACCESS_NAME")
                .unwrap_or(defaults.cookie_access_name),
            cookie_refresh_name: env_string("COOKIE_REFRESH_NAME")
                .unwrap_or(defaults.cookie_refresh_name),
            cookie_domain: env_string("COOKIE_DOMAIN").filter(|d| !d.is_empty()),
            cookie_secure: env_flag("COOKIE_SECURE", defaults.cookie_secure),
            cookie_http_only: defaults.cookie_http_only,
            cookie_same_site: env_string("COOKIE_SAMESITE").unwrap_or(defaults.cookie_same_site),
        }
    }

    /// Header mode configuration
    pub fn bearer() -> Self {
        Self {
            use_cookie_auth: false,
            ..Default::default()
        }
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_access_minutes() -> i64 {
    DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES
}

fn default_refresh_days() -> i64 {
    DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS
}

fn default_max_token_length() -> usize {
    DEFAULT_MAX_TOKEN_LENGTH
}

fn default_http_only() -> bool {
    true
}
