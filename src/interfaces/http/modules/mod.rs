pub mod auth;
pub mod catalog;
pub mod conversations;
pub mod health;
pub mod messages;
pub mod metrics;
pub mod request_id;
pub mod reservations;
