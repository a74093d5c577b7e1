//! SeaORM implementation of MessageRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::message::{Message, MessageRepository, NewMessage, DELETED_PLACEHOLDER};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{conversation, message};

pub struct SeaOrmMessageRepository {
    db: DatabaseConnection,
}

impl SeaOrmMessageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: message::Model) -> Message {
    Message {
        id: m.id,
        conversation_id: m.conversation_id,
        sender_id: m.sender_id,
        content: m.content,
        is_read: m.is_read,
        is_deleted: m.is_deleted,
        created_at: m.created_at,
    }
}

#[async_trait]
impl MessageRepository for SeaOrmMessageRepository {
    async fn create(&self, new: NewMessage) -> DomainResult<Message> {
        debug!(
            conversation_id = new.conversation_id,
            sender_id = new.sender_id,
            "Saving message"
        );
        let model = message::ActiveModel {
            conversation_id: Set(new.conversation_id),
            sender_id: Set(new.sender_id),
            content: Set(new.content),
            is_read: Set(false),
            is_deleted: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Message>> {
        let model = message::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_conversation(&self, conversation_id: i32) -> DomainResult<Vec<Message>> {
        let models = message::Entity::find()
            .filter(message::Column::ConversationId.eq(conversation_id))
            .order_by_asc(message::Column::CreatedAt)
            .order_by_asc(message::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn mark_read_from_others(&self, conversation_id: i32, reader: i32) -> DomainResult<u64> {
        let result = message::Entity::update_many()
            .col_expr(message::Column::IsRead, Expr::value(true))
            .filter(message::Column::ConversationId.eq(conversation_id))
            .filter(message::Column::SenderId.ne(reader))
            .filter(message::Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn mark_read(&self, id: i32) -> DomainResult<()> {
        message::Entity::update_many()
            .col_expr(message::Column::IsRead, Expr::value(true))
            .filter(message::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn archive(&self, id: i32) -> DomainResult<Message> {
        let existing = message::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound(format!("message {} not found", id)))?;

        let mut active: message::ActiveModel = existing.into();
        active.content = Set(DELETED_PLACEHOLDER.to_string());
        active.is_deleted = Set(true);
        let saved = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn count_unread_in(&self, conversation_id: i32, reader: i32) -> DomainResult<u64> {
        message::Entity::find()
            .filter(message::Column::ConversationId.eq(conversation_id))
            .filter(message::Column::SenderId.ne(reader))
            .filter(message::Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count_unread_for(&self, reader: i32) -> DomainResult<u64> {
        let conversations = Query::select()
            .column(conversation::Column::Id)
            .from(conversation::Entity)
            .cond_where(
                Condition::any()
                    .add(conversation::Column::UserId.eq(reader))
                    .add(conversation::Column::AdminId.eq(reader)),
            )
            .to_owned();

        message::Entity::find()
            .filter(message::Column::ConversationId.in_subquery(conversations))
            .filter(message::Column::SenderId.ne(reader))
            .filter(message::Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
