//! Catalog entities: park days and the price list

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::shared::DomainError;

/// A calendar day on which the park is or isn't operating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkDate {
    pub id: i32,
    /// Unique per calendar day
    pub day: NaiveDate,
    pub is_open: bool,
    pub open_hour: Option<NaiveTime>,
    pub close_hour: Option<NaiveTime>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewParkDate {
    pub day: NaiveDate,
    pub is_open: bool,
    pub open_hour: Option<NaiveTime>,
    pub close_hour: Option<NaiveTime>,
    pub notes: Option<String>,
}

impl NewParkDate {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let (Some(open), Some(close)) = (self.open_hour, self.close_hour) {
            if close <= open {
                return Err(DomainError::validation(
                    "closing hour must be after opening hour",
                ));
            }
        }
        Ok(())
    }
}

/// A sellable ticket definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub id: i32,
    pub label: String,
    pub ticket_type: String,
    pub amount: Decimal,
    pub duration_days: i32,
}

#[derive(Debug, Clone)]
pub struct NewPrice {
    pub label: String,
    pub ticket_type: String,
    pub amount: Decimal,
    pub duration_days: i32,
}

impl NewPrice {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_price_fields(
            Some(&self.label),
            Some(&self.ticket_type),
            Some(self.amount),
            Some(self.duration_days),
        )
    }
}

/// Partial update of a price. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PriceChanges {
    pub label: Option<String>,
    pub ticket_type: Option<String>,
    pub amount: Option<Decimal>,
    pub duration_days: Option<i32>,
}

impl PriceChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_price_fields(
            self.label.as_deref(),
            self.ticket_type.as_deref(),
            self.amount,
            self.duration_days,
        )
    }
}

fn validate_price_fields(
    label: Option<&str>,
    ticket_type: Option<&str>,
    amount: Option<Decimal>,
    duration_days: Option<i32>,
) -> Result<(), DomainError> {
    if label.is_some_and(|l| l.trim().is_empty()) {
        return Err(DomainError::validation("price label is required"));
    }
    if ticket_type.is_some_and(|t| t.trim().is_empty()) {
        return Err(DomainError::validation("ticket type is required"));
    }
    if amount.is_some_and(|a| a.is_sign_negative() && !a.is_zero()) {
        return Err(DomainError::validation("price amount cannot be negative"));
    }
    if duration_days.is_some_and(|d| d < 1) {
        return Err(DomainError::validation("duration must be at least one day"));
    }
    Ok(())
}

/// Money is persisted as integer cents.
pub fn to_cents(amount: Decimal) -> Result<i64, DomainError> {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or_else(|| DomainError::validation("amount out of range"))
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
