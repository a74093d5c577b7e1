//! Message router — posting, reading and deleting support messages
//!
//! Every operation re-derives participation from the stored conversation.

use std::sync::Arc;

use tracing::info;

use super::conversation_service::ConversationRegistry;
use crate::domain::conversation::Conversation;
use crate::domain::identity::Caller;
use crate::domain::message::{Message, NewMessage};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::require_non_blank;

/// A message to post, either into an existing conversation or opening a
/// new one.
#[derive(Debug, Clone, Default)]
pub struct PostMessage {
    pub conversation_id: Option<i32>,
    /// Staff member to address when opening a conversation
    pub recipient_id: Option<i32>,
    /// Subject of a new conversation
    pub subject: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub message: Message,
    pub conversation: Conversation,
}

pub struct MessageRouter {
    repos: Arc<dyn RepositoryProvider>,
    registry: ConversationRegistry,
}

impl MessageRouter {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            registry: ConversationRegistry::new(repos.clone()),
            repos,
        }
    }

    pub async fn create(&self, sender: Caller, payload: PostMessage) -> DomainResult<PostedMessage> {
        let content =
            require_non_blank(Some(payload.content.as_str()), "message content is required")?;

        let conversation = match payload.conversation_id {
            Some(id) => {
                let conversation = self.participant_view(id, sender).await?;
                if conversation.is_closed() {
                    return Err(DomainError::forbidden(
                        "cannot post a new message on a closed conversation",
                    ));
                }
                conversation
            }
            None => {
                let subject = require_non_blank(
                    payload.subject.as_deref(),
                    "conversation subject is required",
                )?;
                self.registry
                    .create(sender.id(), payload.recipient_id, Some(subject))
                    .await?
            }
        };

        let message = self
            .repos
            .messages()
            .create(NewMessage {
                conversation_id: conversation.id,
                sender_id: sender.id(),
                content: content.to_string(),
            })
            .await?;
        self.registry.touch(conversation.id).await?;

        metrics::counter!("messages_posted_total").increment(1);
        info!(
            message_id = message.id,
            conversation_id = conversation.id,
            sender_id = sender.id(),
            "Message posted"
        );

        Ok(PostedMessage {
            message,
            conversation,
        })
    }

    /// Messages of a conversation, oldest first.
    pub async fn find_all_by_conversation(
        &self,
        conversation_id: i32,
        caller: Caller,
    ) -> DomainResult<Vec<Message>> {
        self.participant_view(conversation_id, caller).await?;
        self.repos.messages().list_for_conversation(conversation_id).await
    }

    /// Mark everything the other participant sent as read.
    pub async fn mark_as_read(&self, conversation_id: i32, caller: Caller) -> DomainResult<u64> {
        self.participant_view(conversation_id, caller).await?;
        self.repos
            .messages()
            .mark_read_from_others(conversation_id, caller.id())
            .await
    }

    pub async fn mark_message_read(&self, message_id: i32, caller: Caller) -> DomainResult<Message> {
        let mut message = self.load(message_id).await?;
        self.participant_view(message.conversation_id, caller).await?;

        if message.sender_id == caller.id() {
            return Err(DomainError::validation("cannot mark your own messages as read"));
        }
        if !message.is_read {
            self.repos.messages().mark_read(message_id).await?;
            message.is_read = true;
        }
        Ok(message)
    }

    /// Unread messages addressed to the caller across all conversations.
    pub async fn unread_count(&self, caller: Caller) -> DomainResult<u64> {
        self.repos.messages().count_unread_for(caller.id()).await
    }

    /// Soft delete: the row stays, its content is replaced.
    pub async fn remove(&self, id: i32, caller: Caller) -> DomainResult<Message> {
        let message = self.load(id).await?;
        let conversation = self.registry.load(message.conversation_id).await?;

        if !caller.may_delete_message(message.sender_id) || !conversation.is_participant(caller.id())
        {
            return Err(DomainError::forbidden("you cannot delete this message"));
        }
        if conversation.is_closed() {
            return Err(DomainError::forbidden(
                "cannot delete a message in a closed conversation",
            ));
        }
        if message.is_deleted {
            return Err(DomainError::validation("message already deleted"));
        }

        let archived = self.repos.messages().archive(id).await?;
        info!(message_id = id, by = caller.id(), "Message deleted");
        Ok(archived)
    }

    async fn load(&self, id: i32) -> DomainResult<Message> {
        self.repos
            .messages()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("message {} not found", id)))
    }

    /// Load a conversation the caller takes part in. Unknown ids are
    /// refused like any other conversation the caller is not part of.
    async fn participant_view(
        &self,
        conversation_id: i32,
        caller: Caller,
    ) -> DomainResult<Conversation> {
        self.repos
            .conversations()
            .find_by_id(conversation_id)
            .await?
            .filter(|c| c.is_participant(caller.id()))
            .ok_or_else(|| DomainError::forbidden("you are not part of this conversation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{repos, seed_user};
    use crate::domain::identity::Role;
    use crate::domain::message::DELETED_PLACEHOLDER;

    struct Fixture {
        router: MessageRouter,
        repos: Arc<dyn RepositoryProvider>,
        customer: Caller,
        admin: Caller,
    }

    async fn fixture() -> Fixture {
        let repos = repos().await;
        let customer = seed_user(&repos, "visitor", Role::Client).await.as_caller();
        let admin = seed_user(&repos, "support", Role::Admin).await.as_caller();
        Fixture {
            router: MessageRouter::new(repos.clone()),
            repos,
            customer,
            admin,
        }
    }

    fn opening(content: &str) -> PostMessage {
        PostMessage {
            subject: Some("Lost bag".into()),
            content: content.into(),
            ..Default::default()
        }
    }

    fn reply(conversation_id: i32, content: &str) -> PostMessage {
        PostMessage {
            conversation_id: Some(conversation_id),
            content: content.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn first_message_opens_a_conversation() {
        let f = fixture().await;
        let posted = f.router.create(f.customer, opening("Hello")).await.unwrap();

        assert_eq!(posted.conversation.user_id, f.customer.id());
        assert_eq!(posted.conversation.admin_id, f.admin.id());
        assert!(!posted.message.is_read);

        let again = f.router.create(f.customer, opening("Still there?")).await.unwrap();
        assert_eq!(again.conversation.id, posted.conversation.id);
    }

    #[tokio::test]
    async fn opening_requires_a_subject_and_content() {
        let f = fixture().await;
        let err = f
            .router
            .create(
                f.customer,
                PostMessage {
                    content: "Hello".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "conversation subject is required");

        let err = f.router.create(f.customer, opening("  ")).await.unwrap_err();
        assert_eq!(err.to_string(), "message content is required");
    }

    #[tokio::test]
    async fn posting_touches_the_conversation() {
        let f = fixture().await;
        let posted = f.router.create(f.customer, opening("Hello")).await.unwrap();
        let before = posted.conversation.updated_at;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        f.router
            .create(f.admin, reply(posted.conversation.id, "How can I help?"))
            .await
            .unwrap();

        let after = f
            .repos
            .conversations()
            .find_by_id(posted.conversation.id)
            .await
            .unwrap()
            .unwrap()
            .updated_at;
        assert!(after > before);
    }

    #[tokio::test]
    async fn outsiders_cannot_post_or_read() {
        let f = fixture().await;
        let stranger = seed_user(&f.repos, "stranger", Role::Client).await.as_caller();
        let colleague = seed_user(&f.repos, "colleague", Role::Admin).await.as_caller();
        let posted = f.router.create(f.customer, opening("Hello")).await.unwrap();
        let id = posted.conversation.id;

        for outsider in [stranger, colleague] {
            let err = f.router.create(outsider, reply(id, "hi")).await.unwrap_err();
            assert_eq!(err.to_string(), "you are not part of this conversation");
            assert!(f.router.find_all_by_conversation(id, outsider).await.is_err());
        }
    }

    #[tokio::test]
    async fn unknown_conversation_is_refused_like_a_foreign_one() {
        let f = fixture().await;

        let err = f.router.create(f.customer, reply(4242, "hi")).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(err.to_string(), "you are not part of this conversation");

        let err = f
            .router
            .find_all_by_conversation(4242, f.admin)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = f.router.mark_as_read(4242, f.customer).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn closed_conversation_rejects_everyone() {
        let f = fixture().await;
        let posted = f.router.create(f.customer, opening("Hello")).await.unwrap();
        let id = posted.conversation.id;
        f.router
            .registry
            .update_status(id, "CLOSED", f.admin)
            .await
            .unwrap();

        for caller in [f.customer, f.admin] {
            let err = f.router.create(caller, reply(id, "ping")).await.unwrap_err();
            assert!(matches!(err, DomainError::Forbidden(_)));
            assert_eq!(
                err.to_string(),
                "cannot post a new message on a closed conversation"
            );
        }
    }

    #[tokio::test]
    async fn history_is_ascending() {
        let f = fixture().await;
        let posted = f.router.create(f.customer, opening("first")).await.unwrap();
        let id = posted.conversation.id;
        f.router.create(f.admin, reply(id, "second")).await.unwrap();
        f.router.create(f.customer, reply(id, "third")).await.unwrap();

        let contents: Vec<String> = f
            .router
            .find_all_by_conversation(id, f.admin)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn mark_as_read_only_flips_the_other_side() {
        let f = fixture().await;
        let posted = f.router.create(f.customer, opening("one")).await.unwrap();
        let id = posted.conversation.id;
        f.router.create(f.customer, reply(id, "two")).await.unwrap();
        f.router.create(f.admin, reply(id, "answer")).await.unwrap();

        assert_eq!(f.router.unread_count(f.admin).await.unwrap(), 2);
        assert_eq!(f.router.unread_count(f.customer).await.unwrap(), 1);

        let flipped = f.router.mark_as_read(id, f.admin).await.unwrap();
        assert_eq!(flipped, 2);
        assert_eq!(f.router.unread_count(f.admin).await.unwrap(), 0);

        let messages = f.router.find_all_by_conversation(id, f.admin).await.unwrap();
        let admin_message = messages.iter().find(|m| m.sender_id == f.admin.id()).unwrap();
        assert!(!admin_message.is_read);
    }

    #[tokio::test]
    async fn single_message_read_rejects_own_message() {
        let f = fixture().await;
        let posted = f.router.create(f.customer, opening("one")).await.unwrap();

        let err = f
            .router
            .mark_message_read(posted.message.id, f.customer)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot mark your own messages as read");

        let read = f
            .router
            .mark_message_read(posted.message.id, f.admin)
            .await
            .unwrap();
        assert!(read.is_read);
    }

    #[tokio::test]
    async fn delete_archives_the_message() {
        let f = fixture().await;
        let posted = f.router.create(f.customer, opening("oops")).await.unwrap();

        let archived = f.router.remove(posted.message.id, f.customer).await.unwrap();
        assert!(archived.is_deleted);
        assert_eq!(archived.content, DELETED_PLACEHOLDER);

        let history = f
            .router
            .find_all_by_conversation(posted.conversation.id, f.customer)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, DELETED_PLACEHOLDER);

        let err = f.router.remove(posted.message.id, f.customer).await.unwrap_err();
        assert_eq!(err.to_string(), "message already deleted");
    }

    #[tokio::test]
    async fn sole_admin_cannot_open_a_thread_with_themselves() {
        let f = fixture().await;
        let err = f.router.create(f.admin, opening("hello")).await.unwrap_err();
        assert_eq!(err.to_string(), "cannot create a conversation with yourself");
    }

    #[tokio::test]
    async fn delete_authorization() {
        let f = fixture().await;
        let from_customer = f.router.create(f.customer, opening("mine")).await.unwrap();
        let id = from_customer.conversation.id;
        let from_admin = f.router.create(f.admin, reply(id, "theirs")).await.unwrap();

        // Customer cannot delete the staff member's message.
        let err = f.router.remove(from_admin.message.id, f.customer).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        // Staff participant can delete the customer's message.
        f.router.remove(from_customer.message.id, f.admin).await.unwrap();

        // A staff member outside the conversation cannot.
        let colleague = seed_user(&f.repos, "colleague", Role::Admin).await.as_caller();
        let err = f.router.remove(from_admin.message.id, colleague).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn delete_is_refused_once_closed() {
        let f = fixture().await;
        let posted = f.router.create(f.customer, opening("hello")).await.unwrap();
        f.router
            .registry
            .update_status(posted.conversation.id, "CLOSED", f.admin)
            .await
            .unwrap();

        let err = f.router.remove(posted.message.id, f.customer).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot delete a message in a closed conversation"
        );
    }
}
