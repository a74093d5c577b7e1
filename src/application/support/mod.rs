//! Customer support: conversations between a visitor and a staff member,
//! and the messages inside them.

pub mod conversation_service;
pub mod message_service;

pub use conversation_service::{ConversationDetail, ConversationRegistry, ConversationSummary};
pub use message_service::{MessageRouter, PostMessage, PostedMessage};
