//! PostgreSQL implementation of the TokenStore trait.
//!
//! Every query runs on the caller's transaction. Nothing here commits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use tk_core::domain::entities::token::{TokenRecord, TokenType};
use tk_core::errors::DomainError;
use tk_core::repositories::TokenStore;

use super::{store_error, PgTx};

/// PostgreSQL implementation of TokenStore over the `jwt_tokens` table
///
/// Stateless: the connection comes from the transaction passed to each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgTokenStore;

impl PgTokenStore {
    pub fn new() -> Self {
        Self
    }
}

/// Raw `jwt_tokens` row
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct TokenRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub token_type: String,
    pub is_blacklisted: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenRow {
    /// Map database columns to the TokenRecord entity
    pub(crate) fn into_record(self) -> Result<TokenRecord, DomainError> {
        let token_type = TokenType::parse(&self.token_type).ok_or_else(|| DomainError::Store {
            message: format!("Invalid token type in row {}: {}", self.id, self.token_type),
        })?;

        Ok(TokenRecord {
            id: self.id,
            subject_id: self.user_id,
            token_value: self.token,
            token_type,
            is_blacklisted: self.is_blacklisted,
            created_at: self.created_at,
            expires_at: self.expires_at,
        })
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    type Tx = PgTx;

    async fn insert(&self, tx: &mut Self::Tx, record: TokenRecord) -> Result<TokenRecord, DomainError> {
        let query = r#"
            INSERT INTO jwt_tokens (
                id, user_id, token, token_type, is_blacklisted, created_at, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        sqlx::query(query)
            .bind(record.id)
            .bind(record.subject_id)
            .bind(&record.token_value)
            .bind(record.token_type.as_str())
            .bind(record.is_blacklisted)
            .bind(record.created_at)
            .bind(record.expires_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| store_error("Failed to insert token", e))?;

        Ok(record)
    }

    async fn find_by_value(
        &self,
        tx: &mut Self::Tx,
        token_value: &str,
    ) -> Result<Option<TokenRecord>, DomainError> {
        let query = r#"
            SELECT id, user_id, token, token_type, is_blacklisted, created_at, expires_at
            FROM jwt_tokens
            WHERE token = $1
        "#;

        let row = sqlx::query_as::<_, TokenRow>(query)
            .bind(token_value)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| store_error("Failed to find token", e))?;

        row.map(TokenRow::into_record).transpose()
    }

    async fn mark_blacklisted(&self, tx: &mut Self::Tx, token_value: &str) -> Result<bool, DomainError> {
        // Under READ COMMITTED a concurrent flip blocks here, then the row no
        // longer matches and this unit of work sees zero rows
        let query = r#"
            UPDATE jwt_tokens
            SET is_blacklisted = TRUE
            WHERE token = $1 AND is_blacklisted = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(token_value)
            .execute(&mut **tx)
            .await
            .map_err(|e| store_error("Failed to blacklist token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn blacklist_live_tokens(
        &self,
        tx: &mut Self::Tx,
        subject_id: Uuid,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE jwt_tokens
            SET is_blacklisted = TRUE
            WHERE user_id = $1
              AND token_type = $2
              AND is_blacklisted = FALSE
              AND expires_at > $3
        "#;

        let result = sqlx::query(query)
            .bind(subject_id)
            .bind(token_type.as_str())
            .bind(now)
            .execute(&mut **tx)
            .await
            .map_err(|e| store_error("Failed to blacklist subject tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
