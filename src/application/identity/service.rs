//! User service — registration, login and staff bootstrap
//!
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::identity::Role;
use crate::domain::user::{NewUser, User};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Credentials of the administrator created on first start.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username or email and return a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().find_by_login(username_or_email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(user.id, &user.username, user.role, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        info!(user_id = user.id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a visitor account.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> DomainResult<User> {
        let username = username.trim();
        let email = email.trim();

        if username.len() < 3 || username.len() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        if password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        let user = self.create(username, email, password, Role::Client).await?;
        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    /// Create the configured administrator when no administrator exists yet.
    /// Returns the created account, or `None` when nothing had to be done.
    pub async fn ensure_admin(&self, admin: &AdminBootstrap) -> DomainResult<Option<User>> {
        if self.repos.users().count_admins().await? > 0 {
            return Ok(None);
        }
        if admin.password.len() < 8 {
            warn!("Configured admin password is shorter than 8 characters");
        }

        let user = self
            .create(&admin.username, &admin.email, &admin.password, Role::Admin)
            .await?;
        info!(user_id = user.id, username = %user.username, "Default administrator created");
        Ok(Some(user))
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_user(&self, id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("user {} not found", id)))
    }

    async fn create(&self, username: &str, email: &str, password: &str, role: Role) -> DomainResult<User> {
        let users = self.repos.users();
        if users.find_by_login(username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if users.find_by_login(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::repos;
    use crate::infrastructure::crypto::jwt::verify_token;

    fn service(repos: Arc<dyn RepositoryProvider>) -> UserService {
        UserService::new(repos, JwtConfig::new("test-secret", 1))
    }

    #[tokio::test]
    async fn register_then_login_by_either_identifier() {
        let service = service(repos().await);
        let user = service
            .register("alice", "alice@park.test", "password123")
            .await
            .unwrap();
        assert_eq!(user.role, Role::Client);

        let by_name = service.login("alice", "password123").await.unwrap();
        let by_email = service.login("alice@park.test", "password123").await.unwrap();
        assert_eq!(by_name.user.id, by_email.user.id);

        let claims = verify_token(&by_name.token, &JwtConfig::new("test-secret", 1)).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Client);
    }

    #[tokio::test]
    async fn bad_password_is_unauthorized() {
        let service = service(repos().await);
        service
            .register("alice", "alice@park.test", "password123")
            .await
            .unwrap();
        let err = service.login("alice", "wrong-password").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        let err = service.login("nobody", "password123").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn registration_is_validated_and_unique() {
        let service = service(repos().await);
        assert!(service.register("al", "a@park.test", "password123").await.is_err());
        assert!(service.register("alice", "no-at-sign", "password123").await.is_err());
        assert!(service.register("alice", "a@park.test", "short").await.is_err());

        service
            .register("alice", "alice@park.test", "password123")
            .await
            .unwrap();
        let err = service
            .register("alice", "other@park.test", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn admin_bootstrap_runs_once() {
        let service = service(repos().await);
        let admin = AdminBootstrap {
            username: "admin".into(),
            email: "admin@park.test".into(),
            password: "admin-password".into(),
        };

        let created = service.ensure_admin(&admin).await.unwrap().unwrap();
        assert!(created.is_admin());
        assert!(service.ensure_admin(&admin).await.unwrap().is_none());
    }
}
