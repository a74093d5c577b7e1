//! Conversation domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConversationStatus {
    Open,
    Closed,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Some(Self::Open),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A support thread between one customer and one assigned staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: i32,
    /// Customer
    pub user_id: i32,
    /// Assigned staff member
    pub admin_id: i32,
    /// Subject line
    pub object: String,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
    /// Last activity
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn is_closed(&self) -> bool {
        self.status == ConversationStatus::Closed
    }

    /// Customer or assigned staff member.
    pub fn is_participant(&self, user_id: i32) -> bool {
        self.user_id == user_id || self.admin_id == user_id
    }

    /// The participant on the other side of `user_id`.
    pub fn counterpart_of(&self, user_id: i32) -> i32 {
        if self.user_id == user_id {
            self.admin_id
        } else {
            self.user_id
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_id: i32,
    pub admin_id: i32,
    pub object: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation {
            id: 1,
            user_id: 10,
            admin_id: 20,
            object: "Lost bag".into(),
            status: ConversationStatus::Open,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn participants_are_customer_and_assigned_staff() {
        let c = conversation();
        assert!(c.is_participant(10));
        assert!(c.is_participant(20));
        assert!(!c.is_participant(30));
        assert_eq!(c.counterpart_of(10), 20);
        assert_eq!(c.counterpart_of(20), 10);
    }

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(ConversationStatus::parse("closed"), Some(ConversationStatus::Closed));
        assert_eq!(ConversationStatus::parse("ARCHIVED"), None);
        assert_eq!(ConversationStatus::Open.to_string(), "OPEN");
    }
}
