//! Transaction provider for the PostgreSQL store

use async_trait::async_trait;
use sqlx::PgPool;

use tk_core::errors::DomainError;
use tk_core::repositories::UnitOfWorkProvider;

use super::{store_error, PgTx};

/// Opens one database transaction per unit of work
#[derive(Clone)]
pub struct PgUnitOfWork {
    pool: PgPool,
}

impl PgUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkProvider for PgUnitOfWork {
    type Tx = PgTx;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError> {
        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit transaction", e))
    }

    async fn rollback(&self, tx: Self::Tx) -> Result<(), DomainError> {
        tx.rollback()
            .await
            .map_err(|e| store_error("Failed to roll back transaction", e))
    }
}
