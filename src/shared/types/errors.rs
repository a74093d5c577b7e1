use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed, missing or out-of-range input. Fixable by the caller.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// A uniqueness constraint would be violated.
    #[error("{0}")]
    Conflict(String),

    /// Authenticated, but not allowed to act on this row.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    /// The store failed; propagated unchanged to the boundary.
    #[error("Database error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Whether this error comes from the store rather than a business rule.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

/// True when the store rejected a write because of a unique index.
pub fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_display_their_message_verbatim() {
        let e = DomainError::forbidden("no access to this reservation");
        assert_eq!(e.to_string(), "no access to this reservation");
        assert!(!e.is_infrastructure());
    }

    #[test]
    fn db_errors_become_storage_errors() {
        let e: DomainError = DbErr::Custom("connection reset".into()).into();
        assert!(e.is_infrastructure());
        assert!(e.to_string().contains("connection reset"));
    }
}
