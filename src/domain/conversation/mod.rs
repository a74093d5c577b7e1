//! Conversation aggregate

pub mod model;
pub mod repository;

pub use model::{Conversation, ConversationStatus, NewConversation};
pub use repository::ConversationRepository;
