//! Catalog service — park days and the price list

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::catalog::{NewParkDate, NewPrice, ParkDate, Price, PriceChanges};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct CatalogService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CatalogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn park_date(&self, id: i32) -> DomainResult<ParkDate> {
        self.repos
            .catalog()
            .park_date(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("park date {} not found", id)))
    }

    pub async fn price(&self, id: i32) -> DomainResult<Price> {
        self.repos
            .catalog()
            .price(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("price {} not found", id)))
    }

    /// Park days in `[from, to]`; with `open_only`, closed days are skipped.
    pub async fn list_days(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        open_only: bool,
    ) -> DomainResult<Vec<ParkDate>> {
        if let (Some(from), Some(to)) = (from, to) {
            if to < from {
                return Err(DomainError::validation("'to' must not be before 'from'"));
            }
        }
        let days = self.repos.catalog().list_park_dates(from, to).await?;
        Ok(if open_only {
            days.into_iter().filter(|d| d.is_open).collect()
        } else {
            days
        })
    }

    pub async fn list_prices(&self) -> DomainResult<Vec<Price>> {
        self.repos.catalog().list_prices().await
    }

    pub async fn create_park_date(&self, new: NewParkDate) -> DomainResult<ParkDate> {
        new.validate()?;
        let day = self.repos.catalog().create_park_date(new).await?;
        info!(park_date_id = day.id, day = %day.day, "Park date created");
        Ok(day)
    }

    pub async fn create_price(&self, new: NewPrice) -> DomainResult<Price> {
        new.validate()?;
        let price = self.repos.catalog().create_price(new).await?;
        info!(price_id = price.id, label = %price.label, "Price created");
        Ok(price)
    }

    /// Existing reservations keep the values they were booked with.
    pub async fn update_price(&self, id: i32, changes: PriceChanges) -> DomainResult<Price> {
        changes.validate()?;
        let price = self
            .repos
            .catalog()
            .update_price(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("price {} not found", id)))?;
        info!(price_id = id, amount = %price.amount, "Price updated");
        Ok(price)
    }
}
