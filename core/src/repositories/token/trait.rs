//! Token store trait defining the persistence boundary for issued tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{TokenRecord, TokenType};
use crate::errors::DomainError;

/// Store contract for TokenRecord persistence
///
/// Every operation runs inside a unit of work owned by the caller (`Self::Tx`).
/// Implementations stage their writes in that unit of work and must never
/// commit or roll it back themselves.
///
/// # Guarantees
/// - `token_value` is unique across the store; a duplicate insert fails
/// - Lookups issued through a unit of work observe that unit's own staged writes
/// - Records are never deleted through this trait
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Caller-owned unit of work handle
    type Tx: Send + 'static;

    /// Stage a new token record
    ///
    /// # Arguments
    /// * `tx` - The caller's unit of work
    /// * `record` - The record to persist
    ///
    /// # Returns
    /// * `Ok(TokenRecord)` - The staged record
    /// * `Err(DomainError::Store)` - Insert failed (duplicate value, foreign key, outage)
    async fn insert(&self, tx: &mut Self::Tx, record: TokenRecord) -> Result<TokenRecord, DomainError>;

    /// Find a record by its exact token string
    ///
    /// # Arguments
    /// * `tx` - The caller's unit of work
    /// * `token_value` - The full encoded token
    ///
    /// # Returns
    /// * `Ok(Some(TokenRecord))` - Record found
    /// * `Ok(None)` - No record with that value
    /// * `Err(DomainError::Store)` - Lookup failed
    ///
    /// # Example
    /// ```no_run
    /// # use tk_core::repositories::TokenStore;
    /// # async fn example<S: TokenStore>(store: &S, tx: &mut S::Tx) -> Result<(), tk_core::errors::DomainError> {
    /// match store.find_by_value(tx, "eyJhbGciOiJIUzI1NiJ9...").await? {
    ///     Some(record) if record.is_blacklisted => println!("revoked"),
    ///     Some(record) => println!("issued to {}", record.subject_id),
    ///     None => println!("unknown token"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn find_by_value(
        &self,
        tx: &mut Self::Tx,
        token_value: &str,
    ) -> Result<Option<TokenRecord>, DomainError>;

    /// Flip `is_blacklisted` from false to true for the record with this token string
    ///
    /// The flip is conditional: of two units of work flagging the same record,
    /// at most one may observe `Ok(true)` and still commit. Implementations
    /// either serialize the update (row lock) or fail the later commit.
    ///
    /// # Returns
    /// * `Ok(true)` - This unit of work flipped the flag
    /// * `Ok(false)` - No record with that value, or it is already flagged
    /// * `Err(DomainError::Store)` - Update failed
    async fn mark_blacklisted(&self, tx: &mut Self::Tx, token_value: &str) -> Result<bool, DomainError>;

    /// Stage blacklisting of every live token of one type belonging to a subject
    ///
    /// A token is live when it is neither blacklisted nor expired at `now`.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records flagged
    /// * `Err(DomainError::Store)` - Update failed
    async fn blacklist_live_tokens(
        &self,
        tx: &mut Self::Tx,
        subject_id: Uuid,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError>;
}
