//! Catalog repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{NewParkDate, NewPrice, ParkDate, Price, PriceChanges};
use crate::domain::DomainResult;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn park_date(&self, id: i32) -> DomainResult<Option<ParkDate>>;

    async fn price(&self, id: i32) -> DomainResult<Option<Price>>;

    /// Park days whose day lies in `[from, to]`, ascending.
    async fn list_park_dates(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> DomainResult<Vec<ParkDate>>;

    async fn list_prices(&self) -> DomainResult<Vec<Price>>;

    /// Fails with `Conflict` when a record already exists for that day.
    async fn create_park_date(&self, new: NewParkDate) -> DomainResult<ParkDate>;

    async fn create_price(&self, new: NewPrice) -> DomainResult<Price>;

    /// Returns `None` when the price does not exist.
    async fn update_price(&self, id: i32, changes: PriceChanges) -> DomainResult<Option<Price>>;
}
