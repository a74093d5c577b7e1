//! Booking: pricing, visit-day checks, the reservation engine and the
//! retention job.

pub mod date_guard;
pub mod pricing;
pub mod reservation_service;
pub mod retention;

pub use date_guard::DateGuard;
pub use pricing::{PricedBasket, PricingSnapshotter, TicketRequest};
pub use reservation_service::{BookingPolicy, CreateReservation, ReservationEngine, ReservationView};
pub use retention::{purge_cancelled, start_retention_task};
