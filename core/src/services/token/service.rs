//! Token lifecycle engine: create, verify and blacklist

use chrono::{Duration, SubsecRound};
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::entities::subject::Subject;
use crate::domain::entities::token::{Claims, TokenPair, TokenRecord, TokenType};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{SubjectResolver, TokenStore};
use crate::services::clock::{Clock, SystemClock};

use super::codec::ClaimCodec;
use super::config::TokenServiceConfig;

/// Service for issuing, verifying and revoking stored tokens
///
/// Holds no mutable state of its own. Every operation takes the caller's unit
/// of work and stages its writes there; the caller decides whether to commit.
pub struct TokenService<S, R>
where
    S: TokenStore,
    R: SubjectResolver<S::Tx>,
{
    store: S,
    resolver: R,
    codec: ClaimCodec,
    config: TokenServiceConfig,
    clock: Arc<dyn Clock>,
}

impl<S, R> TokenService<S, R>
where
    S: TokenStore,
    R: SubjectResolver<S::Tx>,
{
    /// Creates a new token service using the system clock
    ///
    /// # Arguments
    ///
    /// * `store` - Token store for persistence
    /// * `resolver` - Subject lookup
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService` instance or a configuration error
    pub fn new(store: S, resolver: R, config: TokenServiceConfig) -> Result<Self, DomainError> {
        Self::with_clock(store, resolver, config, Arc::new(SystemClock))
    }

    /// Creates a new token service reading time from `clock`
    pub fn with_clock(
        store: S,
        resolver: R,
        config: TokenServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        let codec = ClaimCodec::new(&config.secret, config.algorithm)?;

        Ok(Self {
            store,
            resolver,
            codec,
            config,
            clock,
        })
    }

    #[cfg(test)]
    pub(crate) fn codec(&self) -> &ClaimCodec {
        &self.codec
    }

    /// Issues a token with the configured lifetime for its type
    ///
    /// # Arguments
    ///
    /// * `tx` - The caller's unit of work; the new record is staged there
    /// * `subject_id` - Owner of the token
    /// * `token_type` - Access or refresh
    ///
    /// # Returns
    ///
    /// * `Ok(TokenRecord)` - The staged record, carrying the encoded token
    /// * `Err(TokenError::SubjectNotFound)` - No subject with that id
    /// * `Err(DomainError::Encoding)` - Signing failed
    /// * `Err(DomainError::Store)` - Lookup or insert failed
    pub async fn create(
        &self,
        tx: &mut S::Tx,
        subject_id: Uuid,
        token_type: TokenType,
    ) -> Result<TokenRecord, DomainError> {
        self.create_with_lifetime(tx, subject_id, token_type, self.config.lifetime(token_type))
            .await
    }

    /// Issues a token with an explicit lifetime
    pub async fn create_with_lifetime(
        &self,
        tx: &mut S::Tx,
        subject_id: Uuid,
        token_type: TokenType,
        lifetime: Duration,
    ) -> Result<TokenRecord, DomainError> {
        if lifetime <= Duration::zero() {
            return Err(DomainError::Encoding {
                message: "token lifetime must be positive".to_string(),
            });
        }

        if self.resolver.resolve(tx, subject_id).await?.is_none() {
            warn!(subject_id = %subject_id, token_type = %token_type, "Token requested for unknown subject");
            return Err(TokenError::SubjectNotFound.into());
        }

        // Claims carry whole seconds; keep the record consistent with them
        let issued_at = self.clock.now().trunc_subsecs(0);
        let expires_at = issued_at + lifetime;

        let claims = Claims::new(subject_id, token_type, issued_at, expires_at);
        let token_value = self.codec.encode(&claims)?;

        let record = TokenRecord::new(subject_id, token_value, token_type, issued_at, expires_at);
        let record = self.store.insert(tx, record).await.map_err(|e| {
            error!(subject_id = %subject_id, token_type = %token_type, error = %e, "Failed to store token");
            e
        })?;

        debug!(
            record_id = %record.id,
            subject_id = %subject_id,
            token_type = %token_type,
            expires_at = %expires_at,
            "Token issued"
        );
        Ok(record)
    }

    /// Issues an access token and a refresh token in the same unit of work
    pub async fn issue_pair(&self, tx: &mut S::Tx, subject_id: Uuid) -> Result<TokenPair, DomainError> {
        let access = self.create(tx, subject_id, TokenType::Access).await?;
        let refresh = self.create(tx, subject_id, TokenType::Refresh).await?;
        Ok(TokenPair::new(access, refresh))
    }

    /// Verifies a token and resolves its subject
    ///
    /// Checks run in a fixed order and the first failure wins: length, decode
    /// (signature, structure, expiry), type, store lookup, blacklist flag,
    /// subject existence and activation. Nothing is written.
    ///
    /// # Returns
    ///
    /// * `Ok(Subject)` - The token is valid and its subject is active
    /// * `Err(DomainError::Token(_))` - The token was rejected
    /// * `Err(DomainError::Store)` - A lookup failed
    pub async fn verify(
        &self,
        tx: &mut S::Tx,
        token: &str,
        expected_type: TokenType,
    ) -> Result<Subject, DomainError> {
        match self.check(tx, token, expected_type).await {
            Ok(subject) => {
                debug!(subject_id = %subject.id, token_type = %expected_type, "Token verified");
                Ok(subject)
            }
            Err(DomainError::Token(reason)) => {
                warn!(reason = reason.code(), token_type = %expected_type, "Token rejected");
                Err(reason.into())
            }
            Err(e) => {
                error!(error = %e, "Token verification failed");
                Err(e)
            }
        }
    }

    async fn check(
        &self,
        tx: &mut S::Tx,
        token: &str,
        expected_type: TokenType,
    ) -> Result<Subject, DomainError> {
        if token.chars().count() > self.config.max_token_length {
            return Err(TokenError::TokenTooLarge.into());
        }

        let claims = self.codec.decode(token, self.clock.now())?;
        let subject_id = claims
            .subject_id()
            .map_err(|_| TokenError::MalformedToken)?;

        if claims.token_type != expected_type {
            return Err(TokenError::WrongTokenType.into());
        }

        let record = self
            .store
            .find_by_value(tx, token)
            .await?
            .ok_or(TokenError::TokenNotFound)?;

        if record.is_blacklisted {
            return Err(TokenError::TokenRevoked.into());
        }

        let subject = self
            .resolver
            .resolve(tx, subject_id)
            .await?
            .ok_or(TokenError::SubjectNotFound)?;

        if !subject.is_active {
            return Err(TokenError::SubjectInactive.into());
        }

        Ok(subject)
    }

    /// Revokes a token by its exact string
    ///
    /// Blacklisting an already blacklisted token is a no-op. Expired tokens
    /// can still be blacklisted.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The token is (or already was) blacklisted in `tx`
    /// * `Err(TokenError::TokenNotFound)` - No record with that value
    /// * `Err(DomainError::Store)` - Lookup or update failed
    pub async fn blacklist(&self, tx: &mut S::Tx, token: &str) -> Result<(), DomainError> {
        let record = self
            .store
            .find_by_value(tx, token)
            .await?
            .ok_or(TokenError::TokenNotFound)?;

        if record.is_blacklisted {
            debug!(record_id = %record.id, "Token already blacklisted");
            return Ok(());
        }

        if self.store.mark_blacklisted(tx, token).await? {
            debug!(record_id = %record.id, subject_id = %record.subject_id, "Token blacklisted");
        } else {
            debug!(record_id = %record.id, "Token blacklisted concurrently");
        }
        Ok(())
    }

    /// Blacklists a token this unit of work has just verified, failing if
    /// another unit of work got there first
    ///
    /// Used where a token may be spent only once (rotation, logout).
    ///
    /// # Returns
    ///
    /// * `Ok(())` - This unit of work flipped the flag
    /// * `Err(TokenError::TokenRevoked)` - The token is already blacklisted
    pub(super) async fn spend(&self, tx: &mut S::Tx, token: &str) -> Result<(), DomainError> {
        if !self.store.mark_blacklisted(tx, token).await? {
            warn!(reason = TokenError::TokenRevoked.code(), "Token already spent");
            return Err(TokenError::TokenRevoked.into());
        }
        Ok(())
    }

    /// Blacklists every live access token of a subject
    pub async fn revoke_access_tokens(&self, tx: &mut S::Tx, subject_id: Uuid) -> Result<usize, DomainError> {
        let count = self
            .store
            .blacklist_live_tokens(tx, subject_id, TokenType::Access, self.clock.now())
            .await?;

        debug!(subject_id = %subject_id, count, "Access tokens revoked");
        Ok(count)
    }
}
