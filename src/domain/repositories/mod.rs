//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `DomainResult` — standard result type for domain operations

use super::catalog::CatalogRepository;
use super::conversation::ConversationRepository;
use super::message::MessageRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use crate::shared::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let day = repos.catalog().park_date(1).await?;
///     let mine = repos.reservations().find_by_user(7).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn catalog(&self) -> &dyn CatalogRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn conversations(&self) -> &dyn ConversationRepository;
    fn messages(&self) -> &dyn MessageRepository;
}
