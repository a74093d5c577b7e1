//! User domain entity

use chrono::{DateTime, Utc};

use crate::domain::identity::{Caller, Role};

/// An account: a park visitor or a staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    /// Public handle, unique
    pub username: String,
    /// Unique
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn as_caller(&self) -> Caller {
        Caller::new(self.id, self.role)
    }
}

/// Data needed to insert a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
