//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod catalog_repository;
pub mod conversation_repository;
pub mod message_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::shared::DomainError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}
