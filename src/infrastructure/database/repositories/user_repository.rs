//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::identity::Role;
use crate::domain::user::{NewUser, User, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;
use crate::shared::is_unique_violation;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: user::Model) -> DomainResult<User> {
    let role = Role::parse(&m.role)
        .ok_or_else(|| DomainError::Storage(format!("unknown role '{}' on user {}", m.role, m.id)))?;
    Ok(User {
        id: m.id,
        username: m.username,
        email: m.email,
        password_hash: m.password_hash,
        role,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new: NewUser) -> DomainResult<User> {
        debug!(username = %new.username, role = %new.role, "Creating user");
        let now = Utc::now();

        let model = user::ActiveModel {
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            role: Set(new.role.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("username or email already exists".to_string())
            } else {
                db_err(e)
            }
        })?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(login))
                    .add(user::Column::Email.eq(login)),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn first_active_admin(&self) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Role.eq(Role::Admin.as_str()))
            .filter(user::Column::IsActive.eq(true))
            .order_by_asc(user::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn count_admins(&self) -> DomainResult<u64> {
        user::Entity::find()
            .filter(user::Column::Role.eq(Role::Admin.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
