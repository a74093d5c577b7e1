//! Reservation domain entity

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Price;
use crate::shared::{fold_keyword, PaginationParams};

/// Default minimum number of days between today and the visit for a
/// customer to cancel on their own.
pub const CANCELLATION_WINDOW_DAYS: i64 = 10;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 3] = [Self::Pending, Self::Confirmed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Words a back-office user may type for this status, in English and
    /// French, already folded.
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Pending => &["pending", "en attente", "attente"],
            Self::Confirmed => &["confirmed", "confirmee", "confirme"],
            Self::Cancelled => &["cancelled", "canceled", "annulee", "annule"],
        }
    }

    /// Statuses whose keywords start with the search term (accent and
    /// case insensitive). Terms shorter than three letters match nothing.
    pub fn matching_keyword(term: &str) -> Vec<Self> {
        let folded = fold_keyword(term);
        if folded.chars().count() < 3 {
            return Vec::new();
        }
        Self::ALL
            .into_iter()
            .filter(|s| s.keywords().iter().any(|k| k.starts_with(&folded)))
            .collect()
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frozen record of one priced item at the moment of booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLine {
    pub price_id: i32,
    pub label: String,
    pub ticket_type: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl TicketLine {
    pub fn snapshot(price: &Price, quantity: u32) -> Self {
        let unit_price = price.amount;
        Self {
            price_id: price.id,
            label: price.label.clone(),
            ticket_type: price.ticket_type.clone(),
            quantity,
            unit_price,
            subtotal: unit_price * Decimal::from(quantity),
        }
    }
}

/// A booked visit
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    /// Human-facing reference, unique across all reservations
    pub reservation_number: String,
    /// Owner
    pub user_id: i32,
    /// Park day being visited
    pub date_id: i32,
    pub tickets: Vec<TicketLine>,
    pub total_amount: Decimal,
    pub status: ReservationStatus,
    /// Set while the reservation is cancelled
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }

    /// Move to `status`, keeping `cancelled_at` consistent with it.
    pub fn transition(&mut self, status: ReservationStatus, now: DateTime<Utc>) {
        if status == ReservationStatus::Cancelled {
            if !self.is_cancelled() {
                self.cancelled_at = Some(now);
            }
        } else {
            self.cancelled_at = None;
        }
        self.status = status;
        self.updated_at = now;
    }
}

/// Data needed to insert a reservation.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub reservation_number: String,
    pub user_id: i32,
    pub date_id: i32,
    pub tickets: Vec<TicketLine>,
    pub total_amount: Decimal,
}

/// Whole days from `today` to `visit_day` (negative once the visit is past).
pub fn days_until_visit(visit_day: NaiveDate, today: NaiveDate) -> i64 {
    (visit_day - today).num_days()
}

/// Last day on which a customer may still cancel.
pub fn cancellation_deadline(visit_day: NaiveDate, window_days: i64) -> NaiveDate {
    visit_day - Duration::days(window_days)
}

/// Whether a customer may self-cancel with `days` left before the visit.
pub fn customer_may_cancel(days: i64, window_days: i64) -> bool {
    days >= window_days
}

// ── Listing ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Created,
    Date,
    Amount,
    Status,
    Number,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" | "created_at" => Some(Self::Created),
            "date" | "visit" => Some(Self::Date),
            "amount" | "total" => Some(Self::Amount),
            "status" => Some(Self::Status),
            "number" | "reservation_number" => Some(Self::Number),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Back-office reservation search.
#[derive(Debug, Clone)]
pub struct ReservationQuery {
    /// Matches reservation number, owner email, owner handle, or a status keyword
    pub search: Option<String>,
    pub user_id: Option<i32>,
    pub status: Option<ReservationStatus>,
    pub ticket_type: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sort: SortKey,
    pub order: SortOrder,
    pub page: PaginationParams,
}

impl Default for ReservationQuery {
    fn default() -> Self {
        Self {
            search: None,
            user_id: None,
            status: None,
            ticket_type: None,
            date_from: None,
            date_to: None,
            sort: SortKey::default(),
            order: SortOrder::default(),
            page: PaginationParams::new(None, None, 10),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
