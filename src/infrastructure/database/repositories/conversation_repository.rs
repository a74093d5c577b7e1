//! SeaORM implementation of ConversationRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::conversation::{
    Conversation, ConversationRepository, ConversationStatus, NewConversation,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::conversation;
use crate::shared::is_unique_violation;

pub struct SeaOrmConversationRepository {
    db: DatabaseConnection,
}

impl SeaOrmConversationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: conversation::Model) -> DomainResult<Conversation> {
    let status = ConversationStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Storage(format!("unknown status '{}' on conversation {}", m.status, m.id))
    })?;
    Ok(Conversation {
        id: m.id,
        user_id: m.user_id,
        admin_id: m.admin_id,
        object: m.object,
        status,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn models_to_domain(models: Vec<conversation::Model>) -> DomainResult<Vec<Conversation>> {
    models.into_iter().map(model_to_domain).collect()
}

// ── ConversationRepository impl ─────────────────────────────────

#[async_trait]
impl ConversationRepository for SeaOrmConversationRepository {
    async fn create(&self, new: NewConversation) -> DomainResult<Conversation> {
        debug!(user_id = new.user_id, admin_id = new.admin_id, "Opening conversation");
        let now = Utc::now();

        let model = conversation::ActiveModel {
            user_id: Set(new.user_id),
            admin_id: Set(new.admin_id),
            object: Set(new.object),
            status: Set(ConversationStatus::Open.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("an open conversation already exists for this pair".into())
            } else {
                db_err(e)
            }
        })?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Conversation>> {
        conversation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_open_for_pair(
        &self,
        user_id: i32,
        admin_id: i32,
    ) -> DomainResult<Option<Conversation>> {
        conversation::Entity::find()
            .filter(conversation::Column::UserId.eq(user_id))
            .filter(conversation::Column::AdminId.eq(admin_id))
            .filter(conversation::Column::Status.ne(ConversationStatus::Closed.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn list_for_customer(&self, user_id: i32) -> DomainResult<Vec<Conversation>> {
        let models = conversation::Entity::find()
            .filter(conversation::Column::UserId.eq(user_id))
            .order_by_desc(conversation::Column::UpdatedAt)
            .order_by_desc(conversation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn list_for_staff(&self, admin_id: i32) -> DomainResult<Vec<Conversation>> {
        let models = conversation::Entity::find()
            .filter(
                Condition::any()
                    .add(conversation::Column::AdminId.eq(admin_id))
                    .add(conversation::Column::Status.eq(ConversationStatus::Open.as_str())),
            )
            .order_by_desc(conversation::Column::UpdatedAt)
            .order_by_desc(conversation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn update_status(&self, id: i32, status: ConversationStatus) -> DomainResult<()> {
        debug!(id, status = %status, "Updating conversation status");
        let result = conversation::Entity::update_many()
            .col_expr(conversation::Column::Status, Expr::value(status.as_str()))
            .col_expr(conversation::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(conversation::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Conflict(
                        "another open conversation already exists for this pair".into(),
                    )
                } else {
                    db_err(e)
                }
            })?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("conversation {} not found", id)));
        }
        Ok(())
    }

    async fn touch(&self, id: i32) -> DomainResult<()> {
        conversation::Entity::update_many()
            .col_expr(conversation::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(conversation::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
