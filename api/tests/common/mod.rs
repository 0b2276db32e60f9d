//! Shared setup for api integration tests
#![allow(dead_code)]

use actix_web::web;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use tk_api::app::session_data;
use tk_api::{AuthSessions, TokenSessions};
use tk_core::domain::{Subject, TokenPair};
use tk_core::repositories::{InMemorySubjectDirectory, InMemoryTokenStore};
use tk_core::services::{FixedClock, TokenService, TokenServiceConfig};
use tk_shared::TransportConfig;

pub const SECRET: &str = "api-test-signing-secret";

pub struct TestContext {
    pub store: InMemoryTokenStore,
    pub subjects: InMemorySubjectDirectory,
    pub clock: Arc<FixedClock>,
    pub sessions: web::Data<dyn AuthSessions>,
}

pub fn context(transport: TransportConfig) -> TestContext {
    let store = InMemoryTokenStore::new();
    let subjects = InMemorySubjectDirectory::new();
    let clock = Arc::new(FixedClock::new(Utc::now()));

    let tokens = TokenService::with_clock(
        store.clone(),
        subjects.clone(),
        TokenServiceConfig::new(SECRET),
        clock.clone(),
    )
    .expect("valid test config");

    let sessions = session_data(TokenSessions::new(store.clone(), Arc::new(tokens), transport));

    TestContext {
        store,
        subjects,
        clock,
        sessions,
    }
}

pub fn bearer_context() -> TestContext {
    context(TransportConfig::bearer())
}

pub fn cookie_context() -> TestContext {
    context(TransportConfig::default())
}

impl TestContext {
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

    pub async fn issue(&self, subject: &Subject) -> TokenPair {
        self.sessions.issue(subject.id).await.expect("issue token pair")
    }
}
