//! Configuration for the token service

use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::fmt;
use std::str::FromStr;

use tk_shared::config::auth::{
    JwtConfig, DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES, DEFAULT_MAX_TOKEN_LENGTH,
    DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS,
};

use crate::domain::entities::token::TokenType;
use crate::errors::DomainError;

/// Configuration for the token service
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// Symmetric signing secret
    pub secret: String,
    /// HMAC signing algorithm
    pub algorithm: Algorithm,
    /// Lifetime of access tokens
    pub access_token_lifetime: Duration,
    /// Lifetime of refresh tokens
    pub refresh_token_lifetime: Duration,
    /// Tokens with more characters than this are rejected before decoding
    pub max_token_length: usize,
}

impl TokenServiceConfig {
    /// Config with default lifetimes and HS256
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            access_token_lifetime: Duration::minutes(DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES),
            refresh_token_lifetime: Duration::days(DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS),
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
        }
    }

    /// Build from the environment-loaded settings
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            DomainError::Configuration {
                message: format!("unsupported signing algorithm: {}", config.algorithm),
            }
        })?;

        let built = Self {
            secret: config.secret.clone(),
            algorithm,
            access_token_lifetime: Duration::seconds(config.access_token_expiry_seconds()),
            refresh_token_lifetime: Duration::seconds(config.refresh_token_expiry_seconds()),
            max_token_length: config.max_token_length,
        };
        built.validate()?;
        Ok(built)
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_access_lifetime(mut self, lifetime: Duration) -> Self {
        self.access_token_lifetime = lifetime;
        self
    }

    pub fn with_refresh_lifetime(mut self, lifetime: Duration) -> Self {
        self.refresh_token_lifetime = lifetime;
        self
    }

    pub fn with_max_token_length(mut self, max_token_length: usize) -> Self {
        self.max_token_length = max_token_length;
        self
    }

    /// Configured lifetime for a token type
    pub fn lifetime(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_token_lifetime,
            TokenType::Refresh => self.refresh_token_lifetime,
        }
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.secret.is_empty() {
            return Err(DomainError::Configuration {
                message: "signing secret must not be empty".to_string(),
            });
        }
        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(DomainError::Configuration {
                message: format!("algorithm {:?} is not an HMAC algorithm", self.algorithm),
            });
        }
        if self.access_token_lifetime <= Duration::zero()
            || self.refresh_token_lifetime <= Duration::zero()
        {
            return Err(DomainError::Configuration {
                message: "token lifetimes must be positive".to_string(),
            });
        }
        if self.max_token_length == 0 {
            return Err(DomainError::Configuration {
                message: "max token length must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_lifetime", &self.access_token_lifetime)
            .field("refresh_token_lifetime", &self.refresh_token_lifetime)
            .field("max_token_length", &self.max_token_length)
            .finish()
    }
}
