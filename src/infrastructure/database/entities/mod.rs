//! Database entities module

pub mod conversation;
pub mod message;
pub mod park_date;
pub mod price;
pub mod reservation;
pub mod user;

pub use conversation::Entity as Conversation;
pub use message::Entity as Message;
pub use park_date::Entity as ParkDate;
pub use price::Entity as Price;
pub use reservation::Entity as Reservation;
pub use user::Entity as User;
