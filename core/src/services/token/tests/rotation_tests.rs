//! Unit tests for refresh rotation and logout

use chrono::Duration;

use crate::domain::entities::token::TokenType;
use crate::errors::{DomainError, TokenError};
use crate::repositories::UnitOfWorkProvider;
use crate::services::test_support::harness;

fn rejected<T: std::fmt::Debug>(result: Result<T, DomainError>) -> TokenError {
    match result {
        Err(DomainError::Token(reason)) => reason,
        other => panic!("expected token rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rotation_revokes_old_refresh_token() {
    let h = harness();
    let subject = h.active_subject().await;

    let mut tx = h.store.begin().await.unwrap();
    let first = h.service.issue_pair(&mut tx, subject.id).await.unwrap();
    h.store.commit(tx).await.unwrap();

    let mut tx = h.store.begin().await.unwrap();
    let (rotated_for, second) = h.service.rotate(&mut tx, first.refresh_token()).await.unwrap();
    h.store.commit(tx).await.unwrap();

    assert_eq!(rotated_for, subject);
    assert_ne!(second.refresh_token(), first.refresh_token());
    assert_ne!(second.access_token(), first.access_token());
    assert_eq!(second.access_expires_in(), 30 * 60);
    assert_eq!(second.refresh_expires_in(), 24 * 60 * 60);

    let mut tx = h.store.begin().await.unwrap();
    let result = h.service.verify(&mut tx, first.refresh_token(), TokenType::Refresh).await;
    assert_eq!(rejected(result), TokenError::TokenRevoked);

    assert_eq!(
        h.service
            .verify(&mut tx, second.refresh_token(), TokenType::Refresh)
            .await
            .unwrap(),
        subject
    );
    assert!(h
        .service
        .verify(&mut tx, second.access_token(), TokenType::Access)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_rotated_token_cannot_be_reused() {
    let h = harness();
    let subject = h.active_subject().await;

    let mut tx = h.store.begin().await.unwrap();
    let pair = h.service.issue_pair(&mut tx, subject.id).await.unwrap();
    h.store.commit(tx).await.unwrap();

    let mut tx = h.store.begin().await.unwrap();
    h.service.rotate(&mut tx, pair.refresh_token()).await.unwrap();
    h.store.commit(tx).await.unwrap();

    let mut tx = h.store.begin().await.unwrap();
    let result = h.service.rotate(&mut tx, pair.refresh_token()).await;
    assert_eq!(rejected(result), TokenError::TokenRevoked);
}

#[tokio::test]
async fn test_rotation_rejects_access_token() {
    let h = harness();
    let subject = h.active_subject().await;

    let mut tx = h.store.begin().await.unwrap();
    let pair = h.service.issue_pair(&mut tx, subject.id).await.unwrap();
    h.store.commit(tx).await.unwrap();

    let mut tx = h.store.begin().await.unwrap();
    let result = h.service.rotate(&mut tx, pair.access_token()).await;
    assert_eq!(rejected(result), TokenError::WrongTokenType);
    assert!(tx.is_empty());
}

#[tokio::test]
async fn test_rolled_back_rotation_keeps_old_token_valid() {
    let h = harness();
    let subject = h.active_subject().await;

    let mut tx = h.store.begin().await.unwrap();
    let pair = h.service.issue_pair(&mut tx, subject.id).await.unwrap();
    h.store.commit(tx).await.unwrap();
    let before = h.store.len().await;

    let mut tx = h.store.begin().await.unwrap();
    let (_, abandoned) = h.service.rotate(&mut tx, pair.refresh_token()).await.unwrap();
    h.store.rollback(tx).await.unwrap();

    assert_eq!(h.store.len().await, before);
    assert!(h.store.committed(abandoned.refresh_token()).await.is_none());

    let mut tx = h.store.begin().await.unwrap();
    assert!(h
        .service
        .verify(&mut tx, pair.refresh_token(), TokenType::Refresh)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_rotation_with_expired_refresh_token() {
    let h = harness();
    let subject = h.active_subject().await;

    let mut tx = h.store.begin().await.unwrap();
    let pair = h.service.issue_pair(&mut tx, subject.id).await.unwrap();
    h.store.commit(tx).await.unwrap();

    h.clock.advance(Duration::days(1));
    let mut tx = h.store.begin().await.unwrap();
    let result = h.service.rotate(&mut tx, pair.refresh_token()).await;
    assert_eq!(rejected(result), TokenError::Expired);
}

#[tokio::test]
async fn test_logout_revokes_session_tokens_only() {
    let h = harness();
    let subject = h.active_subject().await;
    let bystander = h.active_subject().await;

    let mut tx = h.store.begin().await.unwrap();
    let session = h.service.issue_pair(&mut tx, subject.id).await.unwrap();
    let second_device = h.service.create(&mut tx, subject.id, TokenType::Access).await.unwrap();
    let other = h.service.issue_pair(&mut tx, bystander.id).await.unwrap();
    h.store.commit(tx).await.unwrap();

    let mut tx = h.store.begin().await.unwrap();
    let logged_out = h.service.logout(&mut tx, session.refresh_token()).await.unwrap();
    h.store.commit(tx).await.unwrap();
    assert_eq!(logged_out, subject);

    let mut tx = h.store.begin().await.unwrap();
    for (token, token_type) in [
        (session.refresh_token(), TokenType::Refresh),
        (session.access_token(), TokenType::Access),
        (second_device.token_value.as_str(), TokenType::Access),
    ] {
        let result = h.service.verify(&mut tx, token, token_type).await;
        assert_eq!(rejected(result), TokenError::TokenRevoked);
    }

    assert!(h.service.verify(&mut tx, other.access_token(), TokenType::Access).await.is_ok());
    assert!(h.service.verify(&mut tx, other.refresh_token(), TokenType::Refresh).await.is_ok());
}

#[tokio::test]
async fn test_logout_with_unknown_token_stages_nothing() {
    let h = harness();
    let subject = h.active_subject().await;

    let mut tx = h.store.begin().await.unwrap();
    let pair = h.service.issue_pair(&mut tx, subject.id).await.unwrap();
    h.store.rollback(tx).await.unwrap();

    let mut tx = h.store.begin().await.unwrap();
    let result = h.service.logout(&mut tx, pair.refresh_token()).await;
    assert_eq!(rejected(result), TokenError::TokenNotFound);
    assert!(tx.is_empty());
}

#[tokio::test]
async fn test_concurrent_rotation_spends_token_once() {
    let h = harness();
    let subject = h.active_subject().await;

    let mut tx = h.store.begin().await.unwrap();
    let pair = h.service.issue_pair(&mut tx, subject.id).await.unwrap();
    h.store.commit(tx).await.unwrap();

    let mut tx_a = h.store.begin().await.unwrap();
    let mut tx_b = h.store.begin().await.unwrap();
    let (_, from_a) = h.service.rotate(&mut tx_a, pair.refresh_token()).await.unwrap();
    let (_, from_b) = h.service.rotate(&mut tx_b, pair.refresh_token()).await.unwrap();

    h.store.commit(tx_a).await.unwrap();
    let result = h.store.commit(tx_b).await;
    assert_eq!(rejected(result), TokenError::TokenRevoked);

    let mut tx = h.store.begin().await.unwrap();
    assert!(h
        .service
        .verify(&mut tx, from_a.refresh_token(), TokenType::Refresh)
        .await
        .is_ok());
    let result = h.service.verify(&mut tx, from_b.refresh_token(), TokenType::Refresh).await;
    assert_eq!(rejected(result), TokenError::TokenNotFound);
    let result = h.service.verify(&mut tx, from_b.access_token(), TokenType::Access).await;
    assert_eq!(rejected(result), TokenError::TokenNotFound);
}

#[tokio::test]
async fn test_logout_racing_rotation_loses() {
    let h = harness();
    let subject = h.active_subject().await;

    let mut tx = h.store.begin().await.unwrap();
    let pair = h.service.issue_pair(&mut tx, subject.id).await.unwrap();
    h.store.commit(tx).await.unwrap();

    let mut rotating = h.store.begin().await.unwrap();
    let mut leaving = h.store.begin().await.unwrap();
    let (_, rotated) = h.service.rotate(&mut rotating, pair.refresh_token()).await.unwrap();
    h.service.logout(&mut leaving, pair.refresh_token()).await.unwrap();

    h.store.commit(rotating).await.unwrap();
    let result = h.store.commit(leaving).await;
    assert_eq!(rejected(result), TokenError::TokenRevoked);

    let mut tx = h.store.begin().await.unwrap();
    assert!(h
        .service
        .verify(&mut tx, rotated.access_token(), TokenType::Access)
        .await
        .is_ok());
}
