//! Catalog DTOs

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::catalog::{NewParkDate, NewPrice, Price, PriceChanges};

pub use crate::interfaces::http::modules::reservations::ParkDateDto;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParkDateListParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Skip closed days
    #[serde(default)]
    pub open_only: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateParkDateRequest {
    pub day: NaiveDate,
    #[serde(default = "default_true")]
    pub is_open: bool,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub open_hour: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "19:00:00")]
    pub close_hour: Option<NaiveTime>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

impl From<CreateParkDateRequest> for NewParkDate {
    fn from(r: CreateParkDateRequest) -> Self {
        Self {
            day: r.day,
            is_open: r.is_open,
            open_hour: r.open_hour,
            close_hour: r.close_hour,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePriceRequest {
    #[validate(length(min = 1, max = 100, message = "label must be 1-100 characters"))]
    pub label: String,
    #[validate(length(min = 1, max = 50, message = "ticket type must be 1-50 characters"))]
    pub ticket_type: String,
    #[schema(value_type = String, example = "25.00")]
    pub amount: Decimal,
    #[serde(default = "default_duration")]
    #[validate(range(min = 1, message = "duration must be at least one day"))]
    pub duration_days: i32,
}

fn default_duration() -> i32 {
    1
}

impl From<CreatePriceRequest> for NewPrice {
    fn from(r: CreatePriceRequest) -> Self {
        Self {
            label: r.label,
            ticket_type: r.ticket_type,
            amount: r.amount,
            duration_days: r.duration_days,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePriceRequest {
    #[validate(length(min = 1, max = 100))]
    pub label: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub ticket_type: Option<String>,
    #[schema(value_type = Option<String>, example = "27.50")]
    pub amount: Option<Decimal>,
    #[validate(range(min = 1))]
    pub duration_days: Option<i32>,
}

impl From<UpdatePriceRequest> for PriceChanges {
    fn from(r: UpdatePriceRequest) -> Self {
        Self {
            label: r.label,
            ticket_type: r.ticket_type,
            amount: r.amount,
            duration_days: r.duration_days,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PriceDto {
    pub id: i32,
    pub label: String,
    pub ticket_type: String,
    #[schema(value_type = String, example = "25.00")]
    pub amount: Decimal,
    pub duration_days: i32,
}

impl From<Price> for PriceDto {
    fn from(p: Price) -> Self {
        Self {
            id: p.id,
            label: p.label,
            ticket_type: p.ticket_type,
            amount: p.amount,
            duration_days: p.duration_days,
        }
    }
}
