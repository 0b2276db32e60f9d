//! Shared setup for service tests

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::subject::Subject;
use crate::repositories::{InMemorySubjectDirectory, InMemoryTokenStore};
use crate::services::clock::FixedClock;
use crate::services::token::{TokenService, TokenServiceConfig};

pub const SECRET: &str = "test-signing-secret";

pub type MemoryTokenService = TokenService<InMemoryTokenStore, InMemorySubjectDirectory>;

pub struct Harness {
    pub service: Arc<MemoryTokenService>,
    pub store: InMemoryTokenStore,
    pub subjects: InMemorySubjectDirectory,
    pub clock: Arc<FixedClock>,
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn harness() -> Harness {
    harness_with(TokenServiceConfig::new(SECRET))
}

pub fn harness_with(config: TokenServiceConfig) -> Harness {
    let store = InMemoryTokenStore::new();
    let subjects = InMemorySubjectDirectory::new();
    let clock = Arc::new(FixedClock::new(start()));

    let service = TokenService::with_clock(store.clone(), subjects.clone(), config, clock.clone())
        .expect("valid test config");

    Harness {
        service: Arc::new(service),
        store,
        subjects,
        clock,
    }
}

impl Harness {
    pub async fn active_subject(&self) -> Subject {
        let subject = Subject::active(Uuid::new_v4());
        self.subjects.insert(subject).await;
        subject
    }

    pub async fn admin_subject(&self) -> Subject {
        let subject = Subject::admin(Uuid::new_v4());
        self.subjects.insert(subject).await;
        subject
    }
}
