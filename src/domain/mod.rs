//! Domain layer: entities, value types and repository interfaces.

pub mod catalog;
pub mod conversation;
pub mod identity;
pub mod message;
pub mod repositories;
pub mod reservation;
pub mod user;

pub use catalog::{NewParkDate, NewPrice, ParkDate, Price, PriceChanges};
pub use conversation::{Conversation, ConversationStatus, NewConversation};
pub use identity::{Caller, Role};
pub use message::{Message, NewMessage, DELETED_PLACEHOLDER};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    NewReservation, Reservation, ReservationQuery, ReservationStatus, SortKey, SortOrder,
    TicketLine,
};
pub use user::{NewUser, User};

pub use crate::shared::DomainError;
