//! Caller identity and authorization predicates
//!
//! The boundary layer resolves who is calling before any service runs.
//! Services never compare role strings; they ask the `Caller`.

use serde::{Deserialize, Serialize};

/// Account role as stored on the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Client,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLIENT" => Some(Self::Client),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated principal of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Customer { id: i32 },
    Staff { id: i32 },
}

impl Caller {
    pub fn new(id: i32, role: Role) -> Self {
        match role {
            Role::Client => Self::Customer { id },
            Role::Admin => Self::Staff { id },
        }
    }

    pub fn id(&self) -> i32 {
        match *self {
            Self::Customer { id } | Self::Staff { id } => id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Customer { .. } => Role::Client,
            Self::Staff { .. } => Role::Admin,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff { .. })
    }

    pub fn owns(&self, owner_id: i32) -> bool {
        self.id() == owner_id
    }

    /// Staff see every reservation; customers only their own.
    pub fn can_view_reservation(&self, owner_id: i32) -> bool {
        self.is_staff() || self.owns(owner_id)
    }

    /// Sender or staff. Participation is checked separately.
    pub fn may_delete_message(&self, sender_id: i32) -> bool {
        self.is_staff() || self.owns(sender_id)
    }
}
