//! In-memory subject directory

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::subject::Subject;
use crate::errors::DomainError;

use super::r#trait::SubjectResolver;

/// Subject table kept in memory, readable through any unit of work type
#[derive(Clone, Default)]
pub struct InMemorySubjectDirectory {
    subjects: Arc<RwLock<HashMap<Uuid, Subject>>>,
}

impl InMemorySubjectDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a subject
    pub async fn insert(&self, subject: Subject) {
        self.subjects.write().await.insert(subject.id, subject);
    }

    /// Flip the active flag; returns false if the subject is unknown
    pub async fn set_active(&self, subject_id: Uuid, is_active: bool) -> bool {
        match self.subjects.write().await.get_mut(&subject_id) {
            Some(subject) => {
                subject.is_active = is_active;
                true
            }
            None => false,
        }
    }

    /// Remove a subject entirely
    pub async fn remove(&self, subject_id: Uuid) -> Option<Subject> {
        self.subjects.write().await.remove(&subject_id)
    }
}

#[async_trait]
impl<Tx: Send + 'static> SubjectResolver<Tx> for InMemorySubjectDirectory {
    async fn resolve(&self, _tx: &mut Tx, subject_id: Uuid) -> Result<Option<Subject>, DomainError> {
        Ok(self.subjects.read().await.get(&subject_id).copied())
    }
}
