//! Conversation registry — opening, listing and closing support threads

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::conversation::{Conversation, ConversationStatus, NewConversation};
use crate::domain::identity::Caller;
use crate::domain::message::Message;
use crate::domain::user::User;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::require_non_blank;

/// A conversation with both participants and its full message history.
#[derive(Debug, Clone)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub customer: User,
    pub staff: User,
    pub messages: Vec<Message>,
}

/// A conversation as shown in a list, with the caller's unread count.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub unread_count: u64,
}

pub struct ConversationRegistry {
    repos: Arc<dyn RepositoryProvider>,
}

impl ConversationRegistry {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Open a conversation between `user_id` and a staff member, or return
    /// the one already open for that pair. Without `staff_id` the first
    /// available administrator is assigned.
    pub async fn create(
        &self,
        user_id: i32,
        staff_id: Option<i32>,
        subject: Option<&str>,
    ) -> DomainResult<Conversation> {
        let users = self.repos.users();

        let staff_id = match staff_id {
            Some(id) => id,
            None => {
                users
                    .first_active_admin()
                    .await?
                    .ok_or_else(|| DomainError::not_found("no administrator available"))?
                    .id
            }
        };

        if user_id == staff_id {
            return Err(DomainError::validation(
                "cannot create a conversation with yourself",
            ));
        }

        let staff = users
            .find_by_id(staff_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("administrator {} not found", staff_id)))?;
        if !staff.is_admin() {
            return Err(DomainError::validation("recipient must be an administrator"));
        }
        if users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found(format!("user {} not found", user_id)));
        }

        let conversations = self.repos.conversations();
        if let Some(existing) = conversations.find_open_for_pair(user_id, staff_id).await? {
            debug!(conversation_id = existing.id, "Reusing open conversation");
            return Ok(existing);
        }

        let object = require_non_blank(subject, "conversation subject is required")?;
        let created = conversations
            .create(NewConversation {
                user_id,
                admin_id: staff_id,
                object: object.to_string(),
            })
            .await;

        match created {
            Ok(conversation) => {
                info!(
                    conversation_id = conversation.id,
                    user_id,
                    admin_id = staff_id,
                    "Conversation opened"
                );
                Ok(conversation)
            }
            // Lost a race against a concurrent insert for the same pair.
            Err(DomainError::Conflict(msg)) => conversations
                .find_open_for_pair(user_id, staff_id)
                .await?
                .ok_or(DomainError::Conflict(msg)),
            Err(e) => Err(e),
        }
    }

    pub async fn find_one(&self, id: i32) -> DomainResult<ConversationDetail> {
        let conversation = self.load(id).await?;
        let users = self.repos.users();

        let customer = users.find_by_id(conversation.user_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("user {} not found", conversation.user_id))
        })?;
        let staff = users.find_by_id(conversation.admin_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("administrator {} not found", conversation.admin_id))
        })?;
        let messages = self.repos.messages().list_for_conversation(id).await?;

        Ok(ConversationDetail {
            conversation,
            customer,
            staff,
            messages,
        })
    }

    /// Customers see their own conversations. Staff see the ones assigned
    /// to them plus every conversation still open.
    pub async fn find_by_user(&self, caller: Caller) -> DomainResult<Vec<ConversationSummary>> {
        let conversations = match caller {
            Caller::Customer { id } => self.repos.conversations().list_for_customer(id).await?,
            Caller::Staff { id } => self.repos.conversations().list_for_staff(id).await?,
        };

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let unread_count = self
                .repos
                .messages()
                .count_unread_in(conversation.id, caller.id())
                .await?;
            summaries.push(ConversationSummary {
                conversation,
                unread_count,
            });
        }
        Ok(summaries)
    }

    /// True when `user_id` is the customer or the assigned staff member.
    pub async fn user_has_access(&self, user_id: i32, conversation_id: i32) -> DomainResult<bool> {
        Ok(self
            .repos
            .conversations()
            .find_by_id(conversation_id)
            .await?
            .is_some_and(|c| c.is_participant(user_id)))
    }

    /// Only the assigned staff member may open or close a conversation.
    pub async fn update_status(
        &self,
        id: i32,
        new_status: &str,
        caller: Caller,
    ) -> DomainResult<Conversation> {
        let status = ConversationStatus::parse(new_status)
            .ok_or_else(|| DomainError::validation("invalid status"))?;
        let mut conversation = self.load(id).await?;

        if !caller.is_staff() || conversation.admin_id != caller.id() {
            return Err(DomainError::forbidden(
                "only the assigned administrator can change the status of this conversation",
            ));
        }

        self.repos.conversations().update_status(id, status).await?;
        info!(conversation_id = id, status = %status, "Conversation status changed");

        conversation.status = status;
        Ok(conversation)
    }

    /// Bump the last-activity timestamp.
    pub async fn touch(&self, id: i32) -> DomainResult<()> {
        self.repos.conversations().touch(id).await
    }

    pub(crate) async fn load(&self, id: i32) -> DomainResult<Conversation> {
        self.repos
            .conversations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("conversation {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{repos, seed_user, StubbedProvider};
    use crate::domain::identity::Role;

    struct Fixture {
        registry: ConversationRegistry,
        repos: Arc<dyn RepositoryProvider>,
        customer: User,
        admin: User,
    }

    async fn fixture() -> Fixture {
        let repos = repos().await;
        let customer = seed_user(&repos, "visitor", Role::Client).await;
        let admin = seed_user(&repos, "support", Role::Admin).await;
        Fixture {
            registry: ConversationRegistry::new(repos.clone()),
            repos,
            customer,
            admin,
        }
    }

    #[tokio::test]
    async fn auto_assigns_first_admin() {
        let f = fixture().await;
        seed_user(&f.repos, "second-admin", Role::Admin).await;

        let c = f
            .registry
            .create(f.customer.id, None, Some("Lost bag"))
            .await
            .unwrap();
        assert_eq!(c.admin_id, f.admin.id);
        assert_eq!(c.user_id, f.customer.id);
        assert_eq!(c.status, ConversationStatus::Open);
        assert_eq!(c.object, "Lost bag");
    }

    #[tokio::test]
    async fn no_admin_available() {
        let repos = repos().await;
        let customer = seed_user(&repos, "visitor", Role::Client).await;
        let err = ConversationRegistry::new(repos)
            .create(customer.id, None, Some("Hello"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no administrator available");
    }

    #[tokio::test]
    async fn creation_is_idempotent_per_open_pair() {
        let f = fixture().await;
        let first = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("Refund"))
            .await
            .unwrap();
        let second = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("Another topic"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);

        let all = f.repos.conversations().list_for_customer(f.customer.id).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn closed_conversation_allows_a_new_one() {
        let f = fixture().await;
        let first = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("Refund"))
            .await
            .unwrap();
        f.registry
            .update_status(first.id, "CLOSED", f.admin.as_caller())
            .await
            .unwrap();

        let second = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("New question"))
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn rejects_bad_participants() {
        let f = fixture().await;

        let err = f
            .registry
            .create(f.admin.id, Some(f.admin.id), Some("x"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot create a conversation with yourself");

        let other = seed_user(&f.repos, "other", Role::Client).await;
        let err = f
            .registry
            .create(f.customer.id, Some(other.id), Some("x"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "recipient must be an administrator");

        let err = f
            .registry
            .create(f.customer.id, Some(999), Some("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = f
            .registry
            .create(998, Some(f.admin.id), Some("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("   "))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "conversation subject is required");
    }

    #[tokio::test]
    async fn staff_listing_includes_unclaimed_open_threads() {
        let f = fixture().await;
        let colleague = seed_user(&f.repos, "colleague", Role::Admin).await;
        let other_customer = seed_user(&f.repos, "other", Role::Client).await;

        let assigned_to_colleague = f
            .registry
            .create(other_customer.id, Some(colleague.id), Some("Parking"))
            .await
            .unwrap();
        let mine = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("Tickets"))
            .await
            .unwrap();

        let listed: Vec<i32> = f
            .registry
            .find_by_user(f.admin.as_caller())
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.conversation.id)
            .collect();
        assert!(listed.contains(&mine.id));
        assert!(listed.contains(&assigned_to_colleague.id));

        // Once closed, a colleague's thread drops out of my list.
        f.registry
            .update_status(assigned_to_colleague.id, "CLOSED", colleague.as_caller())
            .await
            .unwrap();
        let listed: Vec<i32> = f
            .registry
            .find_by_user(f.admin.as_caller())
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.conversation.id)
            .collect();
        assert_eq!(listed, vec![mine.id]);

        let customer_view = f.registry.find_by_user(f.customer.as_caller()).await.unwrap();
        assert_eq!(customer_view.len(), 1);
        assert_eq!(customer_view[0].conversation.id, mine.id);
    }

    #[tokio::test]
    async fn access_is_limited_to_participants() {
        let f = fixture().await;
        let stranger = seed_user(&f.repos, "stranger", Role::Client).await;
        let c = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("Hi"))
            .await
            .unwrap();

        assert!(f.registry.user_has_access(f.customer.id, c.id).await.unwrap());
        assert!(f.registry.user_has_access(f.admin.id, c.id).await.unwrap());
        assert!(!f.registry.user_has_access(stranger.id, c.id).await.unwrap());
        assert!(!f.registry.user_has_access(f.customer.id, 12345).await.unwrap());
    }

    #[tokio::test]
    async fn only_assigned_staff_changes_status() {
        let f = fixture().await;
        let colleague = seed_user(&f.repos, "colleague", Role::Admin).await;
        let c = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("Hi"))
            .await
            .unwrap();

        let err = f
            .registry
            .update_status(c.id, "CLOSED", colleague.as_caller())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = f
            .registry
            .update_status(c.id, "CLOSED", f.customer.as_caller())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = f
            .registry
            .update_status(c.id, "PAUSED", f.admin.as_caller())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid status");

        let closed = f
            .registry
            .update_status(c.id, "closed", f.admin.as_caller())
            .await
            .unwrap();
        assert!(closed.is_closed());

        let reopened = f
            .registry
            .update_status(c.id, "OPEN", f.admin.as_caller())
            .await
            .unwrap();
        assert_eq!(reopened.status, ConversationStatus::Open);
    }

    #[tokio::test]
    async fn detail_includes_participants() {
        let f = fixture().await;
        let c = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("Hi"))
            .await
            .unwrap();

        let detail = f.registry.find_one(c.id).await.unwrap();
        assert_eq!(detail.customer.id, f.customer.id);
        assert_eq!(detail.staff.id, f.admin.id);
        assert!(detail.messages.is_empty());

        let err = f.registry.find_one(c.id + 100).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn lost_insert_race_returns_the_winner() {
        let f = fixture().await;
        let racing = ConversationRegistry::new(Arc::new(StubbedProvider::racing_conversations(
            f.repos.clone(),
        )));

        let c = racing
            .create(f.customer.id, Some(f.admin.id), Some("Lost bag"))
            .await
            .unwrap();
        assert_eq!(c.user_id, f.customer.id);
        assert_eq!(c.admin_id, f.admin.id);
        assert_eq!(c.status, ConversationStatus::Open);

        let all = f.repos.conversations().list_for_customer(f.customer.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, c.id);
    }

    #[tokio::test]
    async fn reopening_conflicts_with_another_open_thread() {
        let f = fixture().await;
        let old = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("Refund"))
            .await
            .unwrap();
        f.registry
            .update_status(old.id, "CLOSED", f.admin.as_caller())
            .await
            .unwrap();
        let current = f
            .registry
            .create(f.customer.id, Some(f.admin.id), Some("Parking"))
            .await
            .unwrap();

        let err = f
            .registry
            .update_status(old.id, "OPEN", f.admin.as_caller())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let open = f
            .repos
            .conversations()
            .find_open_for_pair(f.customer.id, f.admin.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(open.id, current.id);
    }
}
