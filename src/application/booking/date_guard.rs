//! Visit-day validation against the catalog.

use chrono::NaiveDate;

use crate::domain::catalog::{CatalogRepository, ParkDate};
use crate::domain::{DomainError, DomainResult};

pub struct DateGuard<'a> {
    catalog: &'a dyn CatalogRepository,
}

impl<'a> DateGuard<'a> {
    pub fn new(catalog: &'a dyn CatalogRepository) -> Self {
        Self { catalog }
    }

    /// The park day must exist, be open, and not lie before `today`.
    pub async fn check(&self, date_id: i32, today: NaiveDate) -> DomainResult<ParkDate> {
        let day = self
            .catalog
            .park_date(date_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("park date {} not found", date_id)))?;

        if !day.is_open {
            return Err(DomainError::validation("park is closed that day"));
        }
        if day.day < today {
            return Err(DomainError::validation("cannot book a past date"));
        }
        Ok(day)
    }
}
