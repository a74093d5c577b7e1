use async_trait::async_trait;

use super::{NewUser, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username or email is taken.
    async fn create(&self, new: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;

    /// Look a user up by username or email.
    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>>;

    /// Active administrator with the lowest id, used for auto-assignment.
    async fn first_active_admin(&self) -> DomainResult<Option<User>>;

    async fn count_admins(&self) -> DomainResult<u64>;
}
