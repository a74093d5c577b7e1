//! Application layer: use cases on top of the domain repositories.

pub mod booking;
pub mod catalog;
pub mod identity;
pub mod support;

#[cfg(test)]
pub(crate) mod test_support;

pub use booking::{
    purge_cancelled, start_retention_task, BookingPolicy, CreateReservation, DateGuard,
    PricedBasket, PricingSnapshotter, ReservationEngine, ReservationView, TicketRequest,
};
pub use catalog::CatalogService;
pub use identity::{AdminBootstrap, AuthResult, UserService};
pub use support::{
    ConversationDetail, ConversationRegistry, ConversationSummary, MessageRouter, PostMessage,
    PostedMessage,
};
