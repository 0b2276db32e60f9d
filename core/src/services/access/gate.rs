//! Access gate built on token verification

use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::subject::Subject;
use crate::domain::entities::token::TokenType;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{SubjectResolver, TokenStore};
use crate::services::token::TokenService;

/// Guards protected operations
///
/// Every token rejection collapses into `AuthError::Unauthorized` so callers
/// learn nothing about why a token failed. Store failures are passed through
/// unchanged.
pub struct AccessGate<S, R>
where
    S: TokenStore,
    R: SubjectResolver<S::Tx>,
{
    tokens: Arc<TokenService<S, R>>,
}

impl<S, R> Clone for AccessGate<S, R>
where
    S: TokenStore,
    R: SubjectResolver<S::Tx>,
{
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<S, R> AccessGate<S, R>
where
    S: TokenStore,
    R: SubjectResolver<S::Tx>,
{
    pub fn new(tokens: Arc<TokenService<S, R>>) -> Self {
        Self { tokens }
    }

    /// Requires a valid access token
    ///
    /// # Returns
    ///
    /// * `Ok(Subject)` - Authenticated subject
    /// * `Err(AuthError::Unauthorized)` - Token missing or rejected
    /// * `Err(DomainError::Store)` - Verification could not reach the store
    pub async fn require_subject(
        &self,
        tx: &mut S::Tx,
        token: Option<&str>,
    ) -> Result<Subject, DomainError> {
        let token = token.ok_or_else(|| {
            debug!("Access denied: no token presented");
            AuthError::Unauthorized
        })?;

        match self.tokens.verify(tx, token, TokenType::Access).await {
            Ok(subject) => Ok(subject),
            Err(DomainError::Token(_)) => Err(AuthError::Unauthorized.into()),
            Err(e) => Err(e),
        }
    }

    /// Requires a valid access token belonging to an admin
    ///
    /// # Returns
    ///
    /// * `Ok(Subject)` - Authenticated admin
    /// * `Err(AuthError::Unauthorized)` - Token missing or rejected
    /// * `Err(AuthError::Forbidden)` - Authenticated but not an admin
    pub async fn require_admin(
        &self,
        tx: &mut S::Tx,
        token: Option<&str>,
    ) -> Result<Subject, DomainError> {
        let subject = self.require_subject(tx, token).await?;
        if !subject.is_admin {
            debug!(subject_id = %subject.id, "Access denied: admin required");
            return Err(AuthError::Forbidden.into());
        }
        Ok(subject)
    }
}
