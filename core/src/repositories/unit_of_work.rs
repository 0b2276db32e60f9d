//! Host-side unit of work contract

use async_trait::async_trait;

use crate::errors::DomainError;

/// Opens and finishes the units of work handed to the token engine
///
/// The engine only ever receives `&mut Self::Tx`; committing or rolling back
/// is the host's decision, made once per request.
#[async_trait]
pub trait UnitOfWorkProvider: Send + Sync {
    type Tx: Send + 'static;

    /// Start a new unit of work
    async fn begin(&self) -> Result<Self::Tx, DomainError>;

    /// Make every staged write durable
    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError>;

    /// Discard every staged write
    async fn rollback(&self, tx: Self::Tx) -> Result<(), DomainError>;
}
