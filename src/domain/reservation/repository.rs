//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewReservation, Reservation, ReservationQuery};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a reservation. A duplicate reservation number yields `Conflict`.
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// All reservations of one owner, newest first
    async fn find_by_user(&self, user_id: i32) -> DomainResult<Vec<Reservation>>;

    /// Filtered, sorted and paginated listing for staff
    async fn search(&self, query: &ReservationQuery) -> DomainResult<PaginatedResult<Reservation>>;

    /// Persist status, `cancelled_at` and `updated_at` of an existing reservation
    async fn update_status(&self, reservation: &Reservation) -> DomainResult<()>;

    /// Physically delete reservations cancelled before `cutoff`.
    /// Returns the number of rows removed.
    async fn purge_cancelled_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64>;
}
