//! PostgreSQL subject lookup against the host's `users` table

use async_trait::async_trait;
use uuid::Uuid;

use tk_core::domain::entities::subject::Subject;
use tk_core::errors::DomainError;
use tk_core::repositories::SubjectResolver;

use super::{store_error, PgTx};

#[derive(Debug, sqlx::FromRow)]
struct SubjectRow {
    id: Uuid,
    is_active: bool,
    is_admin: bool,
}

/// Reads `id`, `is_active` and `is_admin` from `users` through the caller's transaction
#[derive(Debug, Clone, Copy, Default)]
pub struct PgSubjectResolver;

impl PgSubjectResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubjectResolver<PgTx> for PgSubjectResolver {
    async fn resolve(&self, tx: &mut PgTx, subject_id: Uuid) -> Result<Option<Subject>, DomainError> {
        let row = sqlx::query_as::<_, SubjectRow>(
            "SELECT id, is_active, is_admin FROM users WHERE id = $1",
        )
        .bind(subject_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| store_error("Failed to resolve subject", e))?;

        Ok(row.map(|r| Subject::new(r.id, r.is_active, r.is_admin)))
    }
}
