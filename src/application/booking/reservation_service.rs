//! Reservation engine — booking, listing and cancellation use-cases
//!
//! HTTP handlers are thin wrappers around this service. Authorization
//! decisions are made against the resolved `Caller`, never against
//! ownership fields supplied in a payload.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use rand::Rng;
use tracing::{info, warn};

use super::date_guard::DateGuard;
use super::pricing::{PricingSnapshotter, TicketRequest};
use crate::domain::catalog::ParkDate;
use crate::domain::identity::Caller;
use crate::domain::reservation::{
    cancellation_deadline, customer_may_cancel, days_until_visit, NewReservation, Reservation,
    ReservationQuery, ReservationStatus, CANCELLATION_WINDOW_DAYS,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::PaginatedResult;

const NUMBER_SUFFIX_LEN: usize = 5;
const NUMBER_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_NUMBER_ATTEMPTS: usize = 5;

/// Tunables for booking behaviour.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Leading segment of every reservation number
    pub reservation_prefix: String,
    /// Days before the visit under which customers can no longer cancel
    pub cancellation_window_days: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            reservation_prefix: "PARK".to_string(),
            cancellation_window_days: CANCELLATION_WINDOW_DAYS,
        }
    }
}

/// Booking request. Ownership comes from the caller, not the payload.
#[derive(Debug, Clone, Default)]
pub struct CreateReservation {
    pub date_id: Option<i32>,
    pub tickets: Vec<TicketRequest>,
}

/// A reservation together with the values computed for the current caller.
#[derive(Debug, Clone)]
pub struct ReservationView {
    pub reservation: Reservation,
    pub park_date: Option<ParkDate>,
    pub can_cancel: bool,
    pub days_until_visit: Option<i64>,
    pub cancellation_deadline: Option<NaiveDate>,
}

pub struct ReservationEngine {
    repos: Arc<dyn RepositoryProvider>,
    policy: BookingPolicy,
}

impl ReservationEngine {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: BookingPolicy) -> Self {
        Self { repos, policy }
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    // ── Commands ────────────────────────────────────────────────

    /// Price and store a new PENDING reservation for `caller`.
    pub async fn create(
        &self,
        caller: Caller,
        request: CreateReservation,
    ) -> DomainResult<ReservationView> {
        let Some(date_id) = request.date_id else {
            return Err(DomainError::validation("a visit date is required"));
        };
        if request.tickets.is_empty() {
            return Err(DomainError::validation("at least one ticket is required"));
        }

        let today = self.today();
        let park_date = DateGuard::new(self.repos.catalog())
            .check(date_id, today)
            .await?;
        let basket = PricingSnapshotter::new(self.repos.catalog())
            .snapshot(&request.tickets)
            .await?;

        let mut attempt = 0;
        let reservation = loop {
            attempt += 1;
            let new = NewReservation {
                reservation_number: self.generate_number(),
                user_id: caller.id(),
                date_id,
                tickets: basket.lines.clone(),
                total_amount: basket.total_amount,
            };
            match self.repos.reservations().create(new).await {
                Ok(r) => break r,
                Err(DomainError::Conflict(_)) if attempt < MAX_NUMBER_ATTEMPTS => {
                    warn!(attempt, "Reservation number collision, regenerating");
                }
                Err(DomainError::Conflict(_)) => {
                    return Err(DomainError::Conflict(
                        "could not allocate a unique reservation number".into(),
                    ));
                }
                Err(e) => return Err(e),
            }
        };

        metrics::counter!("reservations_created_total").increment(1);
        info!(
            reservation_id = reservation.id,
            number = %reservation.reservation_number,
            user_id = reservation.user_id,
            total = %reservation.total_amount,
            "Reservation created"
        );

        Ok(self.enrich(reservation, Some(park_date), caller, today))
    }

    /// Staff-only at the boundary. Any status may move to any other.
    pub async fn update_status(
        &self,
        id: i32,
        new_status: &str,
        caller: Caller,
    ) -> DomainResult<ReservationView> {
        let status = ReservationStatus::parse(new_status)
            .ok_or_else(|| DomainError::validation("invalid status"))?;
        let mut reservation = self.load(id).await?;

        reservation.transition(status, Utc::now());
        self.repos.reservations().update_status(&reservation).await?;

        info!(reservation_id = id, status = %status, "Reservation status changed");
        self.view(reservation, caller).await
    }

    /// Cancel a reservation. Staff may always cancel; owners only outside
    /// the cancellation window. The row is kept with status CANCELLED.
    pub async fn remove(&self, id: i32, caller: Caller) -> DomainResult<ReservationView> {
        let mut reservation = self.load(id).await?;

        if !caller.can_view_reservation(reservation.user_id) {
            return Err(DomainError::forbidden("no access to this reservation"));
        }
        if reservation.is_cancelled() {
            return Err(DomainError::validation("reservation is already cancelled"));
        }

        let today = self.today();
        let park_date = self.repos.catalog().park_date(reservation.date_id).await?;

        if !caller.is_staff() {
            let visit = park_date.as_ref().map(|d| d.day).ok_or_else(|| {
                DomainError::not_found(format!("park date {} not found", reservation.date_id))
            })?;
            let days = days_until_visit(visit, today);
            if !customer_may_cancel(days, self.policy.cancellation_window_days) {
                return Err(DomainError::forbidden(format!(
                    "cancellation impossible: visit is in {} day(s); cancellation is only possible \
                     if the visit is more than {} days away",
                    days, self.policy.cancellation_window_days
                )));
            }
        }

        reservation.transition(ReservationStatus::Cancelled, Utc::now());
        self.repos.reservations().update_status(&reservation).await?;

        metrics::counter!("reservations_cancelled_total").increment(1);
        info!(
            reservation_id = id,
            by_staff = caller.is_staff(),
            "Reservation cancelled"
        );

        Ok(self.enrich(reservation, park_date, caller, today))
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The caller's own reservations, newest first.
    pub async fn find_by_user(&self, caller: Caller) -> DomainResult<Vec<ReservationView>> {
        let reservations = self.repos.reservations().find_by_user(caller.id()).await?;
        self.view_all(reservations, caller).await
    }

    /// Back-office listing. Staff-only at the boundary.
    pub async fn find_all(
        &self,
        query: &ReservationQuery,
        caller: Caller,
    ) -> DomainResult<PaginatedResult<ReservationView>> {
        let page = self.repos.reservations().search(query).await?;
        let views = self.view_all(page.items, caller).await?;
        Ok(PaginatedResult {
            items: views,
            pagination: page.pagination,
        })
    }

    pub async fn find_one(&self, id: i32, caller: Caller) -> DomainResult<ReservationView> {
        let reservation = self.load(id).await?;
        if !caller.can_view_reservation(reservation.user_id) {
            return Err(DomainError::forbidden("no access to this reservation"));
        }
        self.view(reservation, caller).await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn load(&self, id: i32) -> DomainResult<Reservation> {
        if id <= 0 {
            return Err(DomainError::validation("invalid reservation id"));
        }
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("reservation {} not found", id)))
    }

    fn generate_number(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..NUMBER_SUFFIX_LEN)
            .map(|_| NUMBER_CHARSET[rng.gen_range(0..NUMBER_CHARSET.len())] as char)
            .collect();
        format!(
            "{}-{}-{}",
            self.policy.reservation_prefix,
            Utc::now().timestamp_millis(),
            suffix
        )
    }

    async fn view(&self, reservation: Reservation, caller: Caller) -> DomainResult<ReservationView> {
        let park_date = self.repos.catalog().park_date(reservation.date_id).await?;
        Ok(self.enrich(reservation, park_date, caller, self.today()))
    }

    async fn view_all(
        &self,
        reservations: Vec<Reservation>,
        caller: Caller,
    ) -> DomainResult<Vec<ReservationView>> {
        let mut days: HashMap<i32, Option<ParkDate>> = HashMap::new();
        for r in &reservations {
            if !days.contains_key(&r.date_id) {
                let day = self.repos.catalog().park_date(r.date_id).await?;
                days.insert(r.date_id, day);
            }
        }

        let today = self.today();
        Ok(reservations
            .into_iter()
            .map(|r| {
                let day = days.get(&r.date_id).cloned().flatten();
                self.enrich(r, day, caller, today)
            })
            .collect())
    }

    fn enrich(
        &self,
        reservation: Reservation,
        park_date: Option<ParkDate>,
        caller: Caller,
        today: NaiveDate,
    ) -> ReservationView {
        let window = self.policy.cancellation_window_days;
        let days = park_date.as_ref().map(|d| days_until_visit(d.day, today));
        let can_cancel = if caller.is_staff() {
            true
        } else {
            !reservation.is_cancelled() && days.is_some_and(|d| customer_may_cancel(d, window))
        };

        ReservationView {
            cancellation_deadline: park_date
                .as_ref()
                .map(|d| cancellation_deadline(d.day, window)),
            days_until_visit: days,
            can_cancel,
            park_date,
            reservation,
        }
    }
}
