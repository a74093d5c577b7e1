//! Message domain entity

use chrono::{DateTime, Utc};

/// Content left behind by a soft delete.
pub const DELETED_PLACEHOLDER: &str = "This message has been deleted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub is_read: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
}
