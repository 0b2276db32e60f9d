//! Per-request units of work around the token engine
//!
//! Handlers and extractors never hold a transaction themselves. Each call on
//! `AuthSessions` opens one, runs a single engine or gate operation inside
//! it, then commits on success and rolls back on failure.

use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;

use tk_core::domain::{Subject, TokenPair};
use tk_core::errors::DomainResult;
use tk_core::repositories::{SubjectResolver, TokenStore, UnitOfWorkProvider};
use tk_core::services::{AccessGate, TokenService};
use tk_shared::TransportConfig;

/// Session operations available to request handlers
///
/// Object safe so it can be registered once as `web::Data<dyn AuthSessions>`
/// regardless of which store backs it.
#[async_trait]
pub trait AuthSessions: Send + Sync {
    /// How tokens travel for this deployment
    fn transport(&self) -> &TransportConfig;

    /// Resolve the subject behind an access token
    async fn authenticate(&self, access_token: Option<String>) -> DomainResult<Subject>;

    /// Resolve the subject behind an access token and require admin rights
    async fn authorize_admin(&self, access_token: Option<String>) -> DomainResult<Subject>;

    /// Issue a fresh access and refresh token for a subject the host has
    /// already authenticated by other means
    async fn issue(&self, subject_id: Uuid) -> DomainResult<TokenPair>;

    /// Exchange a refresh token for a new pair
    async fn refresh(&self, refresh_token: &str) -> DomainResult<(Subject, TokenPair)>;

    /// Revoke a refresh token and every live access token of its subject
    async fn logout(&self, refresh_token: &str) -> DomainResult<Subject>;
}

/// `AuthSessions` backed by a token service and a unit-of-work provider
pub struct TokenSessions<P, S, R>
where
    S: TokenStore,
    R: SubjectResolver<S::Tx>,
{
    unit_of_work: P,
    tokens: Arc<TokenService<S, R>>,
    gate: AccessGate<S, R>,
    transport: TransportConfig,
}

impl<P, S, R> TokenSessions<P, S, R>
where
    P: UnitOfWorkProvider<Tx = S::Tx>,
    S: TokenStore,
    R: SubjectResolver<S::Tx>,
{
    pub fn new(unit_of_work: P, tokens: Arc<TokenService<S, R>>, transport: TransportConfig) -> Self {
        let gate = AccessGate::new(Arc::clone(&tokens));
        Self {
            unit_of_work,
            tokens,
            gate,
            transport,
        }
    }

    /// Commit `tx` if `result` is Ok, roll it back otherwise
    async fn finish<T: Send>(&self, tx: S::Tx, result: DomainResult<T>) -> DomainResult<T> {
        match result {
            Ok(value) => {
                self.unit_of_work.commit(tx).await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.unit_of_work.rollback(tx).await {
                    warn!("Rollback after {} failed: {}", e.error_code(), rollback);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl<P, S, R> AuthSessions for TokenSessions<P, S, R>
where
    P: UnitOfWorkProvider<Tx = S::Tx> + 'static,
    S: TokenStore + 'static,
    R: SubjectResolver<S::Tx> + 'static,
{
    fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    async fn authenticate(&self, access_token: Option<String>) -> DomainResult<Subject> {
        let mut tx = self.unit_of_work.begin().await?;
        let result = self.gate.require_subject(&mut tx, access_token.as_deref()).await;
        self.finish(tx, result).await
    }

    async fn authorize_admin(&self, access_token: Option<String>) -> DomainResult<Subject> {
        let mut tx = self.unit_of_work.begin().await?;
        let result = self.gate.require_admin(&mut tx, access_token.as_deref()).await;
        self.finish(tx, result).await
    }

    async fn issue(&self, subject_id: Uuid) -> DomainResult<TokenPair> {
        let mut tx = self.unit_of_work.begin().await?;
        let result = self.tokens.issue_pair(&mut tx, subject_id).await;
        let pair = self.finish(tx, result).await?;

        info!("Issued token pair for subject {}", subject_id);
        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> DomainResult<(Subject, TokenPair)> {
        let mut tx = self.unit_of_work.begin().await?;
        let result = self.tokens.rotate(&mut tx, refresh_token).await;
        self.finish(tx, result).await
    }

    async fn logout(&self, refresh_token: &str) -> DomainResult<Subject> {
        let mut tx = self.unit_of_work.begin().await?;
        let result = self.tokens.logout(&mut tx, refresh_token).await;
        self.finish(tx, result).await
    }
}
