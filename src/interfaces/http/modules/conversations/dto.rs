//! Conversation DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{ConversationDetail, ConversationSummary};
use crate::domain::conversation::Conversation;
use crate::interfaces::http::modules::auth::UserInfo;
use crate::interfaces::http::modules::messages::MessageDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateConversationRequest {
    /// Staff member to talk to; the first available administrator when omitted
    pub admin_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "subject must be 1-200 characters"))]
    pub subject: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateConversationStatusRequest {
    /// OPEN or CLOSED
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationDto {
    pub id: i32,
    pub user_id: i32,
    pub admin_id: i32,
    pub subject: String,
    /// OPEN or CLOSED
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationDto {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            admin_id: c.admin_id,
            subject: c.object,
            status: c.status.as_str().to_string(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationSummaryDto {
    #[serde(flatten)]
    pub conversation: ConversationDto,
    /// Messages from the other participant not read yet
    pub unread_count: u64,
}

impl From<ConversationSummary> for ConversationSummaryDto {
    fn from(s: ConversationSummary) -> Self {
        Self {
            conversation: s.conversation.into(),
            unread_count: s.unread_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationDetailDto {
    #[serde(flatten)]
    pub conversation: ConversationDto,
    pub customer: UserInfo,
    pub staff: UserInfo,
    pub messages: Vec<MessageDto>,
}

impl From<ConversationDetail> for ConversationDetailDto {
    fn from(d: ConversationDetail) -> Self {
        Self {
            conversation: d.conversation.into(),
            customer: d.customer.into(),
            staff: d.staff.into(),
            messages: d.messages.into_iter().map(Into::into).collect(),
        }
    }
}
