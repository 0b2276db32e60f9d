use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tk_core::domain::Subject;

/// Body of `POST /auth/refresh` in bearer mode
///
/// Only emptiness is checked here; the engine enforces the length limit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Body of `POST /auth/logout` in bearer mode
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectResponse {
    pub id: Uuid,
    pub is_active: bool,
    pub is_admin: bool,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id,
            is_active: subject.is_active,
            is_admin: subject.is_admin,
        }
    }
}
