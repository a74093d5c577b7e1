//! Message aggregate

pub mod model;
pub mod repository;

pub use model::{Message, NewMessage, DELETED_PLACEHOLDER};
pub use repository::MessageRepository;
