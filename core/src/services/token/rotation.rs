//! Refresh rotation and logout
//!
//! Both flows stage every write in the caller's unit of work. If the caller
//! rolls back (or never commits), the presented refresh token stays valid and
//! none of the newly issued tokens exist.

use tracing::info;

use crate::domain::entities::subject::Subject;
use crate::domain::entities::token::{TokenPair, TokenType};
use crate::errors::DomainError;
use crate::repositories::{SubjectResolver, TokenStore};

use super::service::TokenService;

impl<S, R> TokenService<S, R>
where
    S: TokenStore,
    R: SubjectResolver<S::Tx>,
{
    /// Exchanges a refresh token for a new access and refresh token
    ///
    /// Verifies the refresh token, blacklists it, then issues a new pair. Once
    /// the caller commits, presenting the old refresh token again fails with
    /// `TokenRevoked`. Of two concurrent rotations of the same token at most
    /// one commits; the other fails with `TokenRevoked` here or at commit.
    ///
    /// # Returns
    ///
    /// * `Ok((Subject, TokenPair))` - Subject the pair was issued to, and the pair
    /// * `Err(DomainError::Token(_))` - The refresh token was rejected
    /// * `Err(DomainError::Store)` - Persistence failed
    pub async fn rotate(
        &self,
        tx: &mut S::Tx,
        refresh_token: &str,
    ) -> Result<(Subject, TokenPair), DomainError> {
        let subject = self.verify(tx, refresh_token, TokenType::Refresh).await?;
        self.spend(tx, refresh_token).await?;
        let pair = self.issue_pair(tx, subject.id).await?;

        info!(subject_id = %subject.id, "Refresh token rotated");
        Ok((subject, pair))
    }

    /// Ends a session
    ///
    /// Verifies and blacklists the refresh token, then blacklists every live
    /// access token of the same subject. Tokens of other subjects are untouched.
    pub async fn logout(&self, tx: &mut S::Tx, refresh_token: &str) -> Result<Subject, DomainError> {
        let subject = self.verify(tx, refresh_token, TokenType::Refresh).await?;
        self.spend(tx, refresh_token).await?;
        let revoked = self.revoke_access_tokens(tx, subject.id).await?;

        info!(subject_id = %subject.id, revoked_access_tokens = revoked, "Session logged out");
        Ok(subject)
    }
}
