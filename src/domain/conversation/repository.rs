//! Conversation repository interface

use async_trait::async_trait;

use super::model::{Conversation, ConversationStatus, NewConversation};
use crate::domain::DomainResult;

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Insert an OPEN conversation. Returns `Conflict` when the pair already
    /// has an open one.
    async fn create(&self, new: NewConversation) -> DomainResult<Conversation>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Conversation>>;

    /// The non-closed conversation between this customer and staff member, if any.
    async fn find_open_for_pair(&self, user_id: i32, admin_id: i32)
        -> DomainResult<Option<Conversation>>;

    /// Conversations owned by a customer, most recent activity first.
    async fn list_for_customer(&self, user_id: i32) -> DomainResult<Vec<Conversation>>;

    /// Conversations assigned to `admin_id` plus every OPEN conversation,
    /// most recent activity first.
    async fn list_for_staff(&self, admin_id: i32) -> DomainResult<Vec<Conversation>>;

    async fn update_status(&self, id: i32, status: ConversationStatus) -> DomainResult<()>;

    /// Bump `updated_at` to now.
    async fn touch(&self, id: i32) -> DomainResult<()>;
}
