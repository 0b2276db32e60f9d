//! PostgreSQL implementations of the token engine's persistence contracts

mod subject_resolver;
mod token_store;
mod unit_of_work;

use sqlx::{Postgres, Transaction};

use tk_core::errors::DomainError;

pub use subject_resolver::PgSubjectResolver;
pub use token_store::PgTokenStore;
#[cfg(test)]
pub(crate) use token_store::TokenRow;
pub use unit_of_work::PgUnitOfWork;

/// Unit of work handle shared by the PostgreSQL store, resolver and provider
pub type PgTx = Transaction<'static, Postgres>;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Convert a driver error into a store error, keeping the failed operation
pub(crate) fn store_error(operation: &str, e: sqlx::Error) -> DomainError {
    let code = e
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned());

    let message = match code.as_deref() {
        Some(UNIQUE_VIOLATION) => format!("{}: duplicate token value", operation),
        Some(FOREIGN_KEY_VIOLATION) => format!("{}: unknown subject", operation),
        _ => format!("{}: {}", operation, e),
    };

    tracing::error!("Token store failure: {}", message);
    DomainError::Store { message }
}
