//! Message DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{PostMessage, PostedMessage};
use crate::domain::message::Message;
use crate::interfaces::http::modules::conversations::ConversationDto;

/// Either `conversation_id` (reply) or `subject` (start a thread) is needed.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PostMessageRequest {
    pub conversation_id: Option<i32>,
    /// Staff member addressed when starting a new thread
    pub recipient_id: Option<i32>,
    #[validate(length(max = 200, message = "subject is limited to 200 characters"))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "content must be 1-5000 characters"))]
    pub content: String,
}

impl From<PostMessageRequest> for PostMessage {
    fn from(r: PostMessageRequest) -> Self {
        Self {
            conversation_id: r.conversation_id,
            recipient_id: r.recipient_id,
            subject: r.subject,
            content: r.content,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageDto {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub is_read: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            sender_id: m.sender_id,
            content: m.content,
            is_read: m.is_read,
            is_deleted: m.is_deleted,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostedMessageDto {
    pub message: MessageDto,
    pub conversation: ConversationDto,
}

impl From<PostedMessage> for PostedMessageDto {
    fn from(p: PostedMessage) -> Self {
        Self {
            message: p.message.into(),
            conversation: p.conversation.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkedReadDto {
    pub marked: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountDto {
    pub count: u64,
}
