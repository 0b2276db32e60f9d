//! In-memory implementation of TokenStore
//!
//! Writes are staged in a `MemoryUnitOfWork` and only become visible to other
//! units of work on commit, which mirrors how the SQL store behaves under a
//! database transaction. Used by tests and by hosts embedding the engine
//! without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::{TokenRecord, TokenType};
use crate::errors::{DomainError, TokenError};
use crate::repositories::unit_of_work::UnitOfWorkProvider;

use super::r#trait::TokenStore;

/// Writes staged by one unit of work
#[derive(Debug, Default)]
pub struct MemoryUnitOfWork {
    inserts: Vec<TokenRecord>,
    blacklists: HashSet<String>,
    // Conditional flips; commit fails if another unit flagged one first
    claims: HashSet<String>,
}

impl MemoryUnitOfWork {
    /// Whether anything has been staged
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.blacklists.is_empty() && self.claims.is_empty()
    }

    fn flags(&self, token_value: &str) -> bool {
        self.blacklists.contains(token_value) || self.claims.contains(token_value)
    }
}

/// Shared in-memory token table
///
/// Cloning yields another handle onto the same table.
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, TokenRecord>>>,
    lookups: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find_by_value` calls served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Simulate an outage: every subsequent call fails with a store error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Committed record for a token string
    pub async fn committed(&self, token_value: &str) -> Option<TokenRecord> {
        self.tokens.read().await.get(token_value).cloned()
    }

    /// Number of committed records
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    fn ensure_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::store("token store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    type Tx = MemoryUnitOfWork;

    async fn insert(&self, tx: &mut Self::Tx, record: TokenRecord) -> Result<TokenRecord, DomainError> {
        self.ensure_available()?;

        let tokens = self.tokens.read().await;
        let duplicate = tokens.contains_key(&record.token_value)
            || tx.inserts.iter().any(|t| t.token_value == record.token_value);
        if duplicate {
            return Err(DomainError::store("duplicate token value"));
        }

        tx.inserts.push(record.clone());
        Ok(record)
    }

    async fn find_by_value(
        &self,
        tx: &mut Self::Tx,
        token_value: &str,
    ) -> Result<Option<TokenRecord>, DomainError> {
        self.ensure_available()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if let Some(staged) = tx.inserts.iter().find(|t| t.token_value == token_value) {
            return Ok(Some(staged.clone()));
        }

        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_value).cloned().map(|mut record| {
            if tx.flags(token_value) {
                record.blacklist();
            }
            record
        }))
    }

    async fn mark_blacklisted(&self, tx: &mut Self::Tx, token_value: &str) -> Result<bool, DomainError> {
        self.ensure_available()?;

        if let Some(staged) = tx.inserts.iter_mut().find(|t| t.token_value == token_value) {
            if staged.is_blacklisted {
                return Ok(false);
            }
            staged.blacklist();
            return Ok(true);
        }

        let tokens = self.tokens.read().await;
        match tokens.get(token_value) {
            Some(record) if !record.is_blacklisted && !tx.flags(token_value) => {
                tx.claims.insert(token_value.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn blacklist_live_tokens(
        &self,
        tx: &mut Self::Tx,
        subject_id: Uuid,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        self.ensure_available()?;

        let matches = |t: &TokenRecord| {
            t.subject_id == subject_id && t.token_type == token_type && t.is_live_at(now)
        };

        let mut count = 0;
        for staged in tx.inserts.iter_mut().filter(|t| matches(&**t)) {
            staged.blacklist();
            count += 1;
        }

        let tokens = self.tokens.read().await;
        for record in tokens.values().filter(|t| matches(&**t)) {
            if !tx.claims.contains(&record.token_value)
                && tx.blacklists.insert(record.token_value.clone())
            {
                count += 1;
            }
        }

        Ok(count)
    }
}

#[async_trait]
impl UnitOfWorkProvider for InMemoryTokenStore {
    type Tx = MemoryUnitOfWork;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        self.ensure_available()?;
        Ok(MemoryUnitOfWork::default())
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError> {
        self.ensure_available()?;

        let mut tokens = self.tokens.write().await;
        if let Some(clash) = tx.inserts.iter().find(|t| tokens.contains_key(&t.token_value)) {
            tracing::error!(record_id = %clash.id, "Commit rejected: duplicate token value");
            return Err(DomainError::store("duplicate token value"));
        }
        let lost = tx
            .claims
            .iter()
            .any(|value| tokens.get(value).map_or(true, |t| t.is_blacklisted));
        if lost {
            tracing::warn!("Commit rejected: token already blacklisted by another unit of work");
            return Err(TokenError::TokenRevoked.into());
        }

        for record in tx.inserts {
            tokens.insert(record.token_value.clone(), record);
        }
        for token_value in tx.blacklists.iter().chain(&tx.claims) {
            if let Some(record) = tokens.get_mut(token_value) {
                record.blacklist();
            }
        }
        Ok(())
    }

    async fn rollback(&self, tx: Self::Tx) -> Result<(), DomainError> {
        drop(tx);
        Ok(())
    }
}
