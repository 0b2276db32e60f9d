//! Subject entity resolved from a verified token

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Principal a token was issued to
///
/// Owned by the host's user directory; the token engine only reads the
/// activation and admin flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject ID
    pub id: Uuid,

    /// Whether the subject may authenticate
    pub is_active: bool,

    /// Whether the subject passes the admin gate
    pub is_admin: bool,
}

impl Subject {
    pub fn new(id: Uuid, is_active: bool, is_admin: bool) -> Self {
        Self {
            id,
            is_active,
            is_admin,
        }
    }

    /// Active, non-admin subject
    pub fn active(id: Uuid) -> Self {
        Self::new(id, true, false)
    }

    /// Active admin subject
    pub fn admin(id: Uuid) -> Self {
        Self::new(id, true, true)
    }
}
