//! Message repository interface

use async_trait::async_trait;

use super::model::{Message, NewMessage};
use crate::domain::DomainResult;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert an unread message.
    async fn create(&self, new: NewMessage) -> DomainResult<Message>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Message>>;

    /// Messages of a conversation, oldest first.
    async fn list_for_conversation(&self, conversation_id: i32) -> DomainResult<Vec<Message>>;

    /// Mark every message in the conversation not sent by `reader` as read.
    /// Returns the number of rows changed.
    async fn mark_read_from_others(&self, conversation_id: i32, reader: i32) -> DomainResult<u64>;

    async fn mark_read(&self, id: i32) -> DomainResult<()>;

    /// Replace the content with the placeholder and flag the row deleted.
    async fn archive(&self, id: i32) -> DomainResult<Message>;

    /// Unread messages in one conversation that `reader` did not send.
    async fn count_unread_in(&self, conversation_id: i32, reader: i32) -> DomainResult<u64>;

    /// Unread messages addressed to `reader` across all their conversations.
    async fn count_unread_for(&self, reader: i32) -> DomainResult<u64>;
}
