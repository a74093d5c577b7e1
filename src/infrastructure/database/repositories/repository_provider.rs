//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::catalog::CatalogRepository;
use crate::domain::conversation::ConversationRepository;
use crate::domain::message::MessageRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;

use super::catalog_repository::SeaOrmCatalogRepository;
use super::conversation_repository::SeaOrmConversationRepository;
use super::message_repository::SeaOrmMessageRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let day = repos.catalog().park_date(1).await?;
/// let thread = repos.conversations().find_by_id(4).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    catalog: SeaOrmCatalogRepository,
    reservations: SeaOrmReservationRepository,
    conversations: SeaOrmConversationRepository,
    messages: SeaOrmMessageRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            catalog: SeaOrmCatalogRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            conversations: SeaOrmConversationRepository::new(db.clone()),
            messages: SeaOrmMessageRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn catalog(&self) -> &dyn CatalogRepository {
        &self.catalog
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn conversations(&self) -> &dyn ConversationRepository {
        &self.conversations
    }

    fn messages(&self) -> &dyn MessageRepository {
        &self.messages
    }
}
