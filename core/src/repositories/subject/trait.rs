//! Subject resolver trait for looking up token owners.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::subject::Subject;
use crate::errors::DomainError;

/// Resolves a subject ID to its activation and admin flags
///
/// Generic over the unit of work type so a resolver can read through the same
/// transaction as the token store it is paired with.
#[async_trait]
pub trait SubjectResolver<Tx: Send + 'static>: Send + Sync {
    /// Look up a subject by ID
    ///
    /// # Returns
    /// * `Ok(Some(Subject))` - Subject exists
    /// * `Ok(None)` - No such subject
    /// * `Err(DomainError::Store)` - Lookup failed
    async fn resolve(&self, tx: &mut Tx, subject_id: Uuid) -> Result<Option<Subject>, DomainError>;
}
