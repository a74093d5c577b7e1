//! SeaORM implementation of CatalogRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::catalog::{
    from_cents, to_cents, CatalogRepository, NewParkDate, NewPrice, ParkDate, Price, PriceChanges,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{park_date, price};
use crate::shared::is_unique_violation;

pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn park_date_to_domain(m: park_date::Model) -> ParkDate {
    ParkDate {
        id: m.id,
        day: m.day,
        is_open: m.is_open,
        open_hour: m.open_hour,
        close_hour: m.close_hour,
        notes: m.notes,
    }
}

fn price_to_domain(m: price::Model) -> Price {
    Price {
        id: m.id,
        label: m.label,
        ticket_type: m.ticket_type,
        amount: from_cents(m.amount_cents),
        duration_days: m.duration_days,
    }
}

// ── CatalogRepository impl ──────────────────────────────────────

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn park_date(&self, id: i32) -> DomainResult<Option<ParkDate>> {
        let model = park_date::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(park_date_to_domain))
    }

    async fn price(&self, id: i32) -> DomainResult<Option<Price>> {
        let model = price::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(price_to_domain))
    }

    async fn list_park_dates(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> DomainResult<Vec<ParkDate>> {
        let mut query = park_date::Entity::find();
        if let Some(from) = from {
            query = query.filter(park_date::Column::Day.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(park_date::Column::Day.lte(to));
        }
        let models = query
            .order_by_asc(park_date::Column::Day)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(park_date_to_domain).collect())
    }

    async fn list_prices(&self) -> DomainResult<Vec<Price>> {
        let models = price::Entity::find()
            .order_by_asc(price::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(price_to_domain).collect())
    }

    async fn create_park_date(&self, new: NewParkDate) -> DomainResult<ParkDate> {
        debug!(day = %new.day, open = new.is_open, "Creating park date");
        let day = new.day;
        let model = park_date::ActiveModel {
            day: Set(new.day),
            is_open: Set(new.is_open),
            open_hour: Set(new.open_hour),
            close_hour: Set(new.close_hour),
            notes: Set(new.notes),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict(format!("park date {} already exists", day))
            } else {
                db_err(e)
            }
        })?;
        Ok(park_date_to_domain(saved))
    }

    async fn create_price(&self, new: NewPrice) -> DomainResult<Price> {
        debug!(label = %new.label, amount = %new.amount, "Creating price");
        let model = price::ActiveModel {
            label: Set(new.label),
            ticket_type: Set(new.ticket_type),
            amount_cents: Set(to_cents(new.amount)?),
            duration_days: Set(new.duration_days),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(price_to_domain(saved))
    }

    async fn update_price(&self, id: i32, changes: PriceChanges) -> DomainResult<Option<Price>> {
        let existing = price::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: price::ActiveModel = existing.into();
        if let Some(label) = changes.label {
            active.label = Set(label);
        }
        if let Some(ticket_type) = changes.ticket_type {
            active.ticket_type = Set(ticket_type);
        }
        if let Some(amount) = changes.amount {
            active.amount_cents = Set(to_cents(amount)?);
        }
        if let Some(duration) = changes.duration_days {
            active.duration_days = Set(duration);
        }

        debug!(price_id = id, "Updating price");
        let saved = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(price_to_domain(saved)))
    }
}
