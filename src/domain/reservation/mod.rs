//! Reservation aggregate
//!
//! Contains the Reservation entity, ticket snapshots, listing types and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{
    cancellation_deadline, customer_may_cancel, days_until_visit, NewReservation, Reservation,
    ReservationQuery, ReservationStatus, SortKey, SortOrder, TicketLine,
    CANCELLATION_WINDOW_DAYS,
};
pub use repository::ReservationRepository;
