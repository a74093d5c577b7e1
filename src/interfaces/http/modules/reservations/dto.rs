//! Reservation DTOs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{CreateReservation, ReservationView, TicketRequest};
use crate::domain::catalog::ParkDate;
use crate::domain::reservation::{
    ReservationQuery, ReservationStatus, SortKey, SortOrder, TicketLine,
};
use crate::domain::DomainError;
use crate::shared::PaginationParams;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct TicketRequestDto {
    pub price_id: Option<i32>,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    /// Park day to visit
    pub date_id: Option<i32>,
    #[validate(length(min = 1, message = "at least one ticket is required"), nested)]
    pub tickets: Vec<TicketRequestDto>,
}

impl From<CreateReservationRequest> for CreateReservation {
    fn from(r: CreateReservationRequest) -> Self {
        Self {
            date_id: r.date_id,
            tickets: r
                .tickets
                .into_iter()
                .map(|t| TicketRequest {
                    price_id: t.price_id,
                    quantity: t.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReservationStatusRequest {
    /// PENDING, CONFIRMED or CANCELLED
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// Staff listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReservationListParams {
    /// Reservation number, owner email or username, or a status keyword
    pub search: Option<String>,
    pub user_id: Option<i32>,
    pub status: Option<String>,
    pub ticket_type: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// created, date, amount, status, number
    pub sort: Option<String>,
    /// asc or desc
    pub order: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl TryFrom<ReservationListParams> for ReservationQuery {
    type Error = DomainError;

    fn try_from(p: ReservationListParams) -> Result<Self, Self::Error> {
        let status = p
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                ReservationStatus::parse(s)
                    .ok_or_else(|| DomainError::validation(format!("unknown status '{}'", s)))
            })
            .transpose()?;
        let sort = match p.sort.as_deref() {
            Some(s) => SortKey::parse(s)
                .ok_or_else(|| DomainError::validation(format!("unknown sort key '{}'", s)))?,
            None => SortKey::default(),
        };
        let order = match p.order.as_deref() {
            Some(s) => SortOrder::parse(s)
                .ok_or_else(|| DomainError::validation(format!("unknown sort order '{}'", s)))?,
            None => SortOrder::default(),
        };

        Ok(Self {
            search: p.search.filter(|s| !s.trim().is_empty()),
            user_id: p.user_id,
            status,
            ticket_type: p.ticket_type.filter(|s| !s.trim().is_empty()),
            date_from: p.date_from,
            date_to: p.date_to,
            sort,
            order,
            page: PaginationParams::new(p.page, p.limit, 10),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketLineDto {
    pub price_id: i32,
    pub label: String,
    pub ticket_type: String,
    pub quantity: u32,
    #[schema(value_type = String, example = "25.00")]
    pub unit_price: Decimal,
    #[schema(value_type = String, example = "50.00")]
    pub subtotal: Decimal,
}

impl From<TicketLine> for TicketLineDto {
    fn from(l: TicketLine) -> Self {
        Self {
            price_id: l.price_id,
            label: l.label,
            ticket_type: l.ticket_type,
            quantity: l.quantity,
            unit_price: l.unit_price,
            subtotal: l.subtotal,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParkDateDto {
    pub id: i32,
    pub day: NaiveDate,
    pub is_open: bool,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub open_hour: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "19:00:00")]
    pub close_hour: Option<NaiveTime>,
    pub notes: Option<String>,
}

impl From<ParkDate> for ParkDateDto {
    fn from(d: ParkDate) -> Self {
        Self {
            id: d.id,
            day: d.day,
            is_open: d.is_open,
            open_hour: d.open_hour,
            close_hour: d.close_hour,
            notes: d.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub reservation_number: String,
    pub user_id: i32,
    pub date_id: i32,
    pub park_date: Option<ParkDateDto>,
    pub tickets: Vec<TicketLineDto>,
    #[schema(value_type = String, example = "65.00")]
    pub total_amount: Decimal,
    /// PENDING, CONFIRMED or CANCELLED
    pub status: String,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub can_cancel: bool,
    pub days_until_visit: Option<i64>,
    pub cancellation_deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReservationView> for ReservationDto {
    fn from(v: ReservationView) -> Self {
        let r = v.reservation;
        Self {
            id: r.id,
            reservation_number: r.reservation_number,
            user_id: r.user_id,
            date_id: r.date_id,
            park_date: v.park_date.map(Into::into),
            tickets: r.tickets.into_iter().map(Into::into).collect(),
            total_amount: r.total_amount,
            status: r.status.as_str().to_string(),
            cancelled_at: r.cancelled_at,
            can_cancel: v.can_cancel,
            days_until_visit: v.days_until_visit,
            cancellation_deadline: v.cancellation_deadline,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
