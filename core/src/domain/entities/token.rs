//! Token entities for JWT-based session management.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of a signed token
///
/// Serialized as the lowercase `type` claim inside the JWT payload and as the
/// `token_type` column in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }

    /// Parses the storage representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "access" => Some(TokenType::Access),
            "refresh" => Some(TokenType::Refresh),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (subject ID in canonical UUID text form)
    pub sub: String,

    /// Token kind
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Issued at timestamp (seconds since epoch)
    pub iat: i64,

    /// JWT ID, random per token so two tokens minted in the same second differ
    pub jti: String,
}

impl Claims {
    /// Creates claims for a token issued at `issued_at` that expires at `expires_at`
    ///
    /// # Arguments
    ///
    /// * `subject_id` - The subject's UUID
    /// * `token_type` - Access or refresh
    /// * `issued_at` - Issue instant
    /// * `expires_at` - Expiry instant
    ///
    /// # Returns
    ///
    /// A new `Claims` instance with a fresh random `jti`
    pub fn new(
        subject_id: Uuid,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject_id.to_string(),
            token_type,
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired at `now`
    ///
    /// A token whose `exp` equals the current second is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets the subject ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn subject_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Persisted token entry
///
/// The store keeps the full token string so that a token can be looked up and
/// revoked by its exact value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Subject this token belongs to
    pub subject_id: Uuid,

    /// Encoded token string, unique across the store
    pub token_value: String,

    /// Token kind
    pub token_type: TokenType,

    /// Whether the token has been revoked
    pub is_blacklisted: bool,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Creates a new, non-blacklisted record
    pub fn new(
        subject_id: Uuid,
        token_value: String,
        token_type: TokenType,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            token_value,
            token_type,
            is_blacklisted: false,
            created_at,
            expires_at,
        }
    }

    /// Checks if the token has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// A token is live if it hasn't expired and hasn't been blacklisted
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_blacklisted && !self.is_expired_at(now)
    }

    /// Marks the record as revoked
    pub fn blacklist(&mut self) {
        self.is_blacklisted = true;
    }

    /// Configured lifetime of the token
    pub fn lifetime(&self) -> Duration {
        self.expires_at - self.created_at
    }
}

/// Access and refresh tokens issued together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token record
    pub access: TokenRecord,

    /// Refresh token record
    pub refresh: TokenRecord,
}

impl TokenPair {
    pub fn new(access: TokenRecord, refresh: TokenRecord) -> Self {
        Self { access, refresh }
    }

    pub fn access_token(&self) -> &str {
        &self.access.token_value
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh.token_value
    }

    /// Access token lifetime in seconds
    pub fn access_expires_in(&self) -> i64 {
        self.access.lifetime().num_seconds()
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_expires_in(&self) -> i64 {
        self.refresh.lifetime().num_seconds()
    }
}
