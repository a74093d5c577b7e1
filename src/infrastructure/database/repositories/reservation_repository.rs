//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, LikeExpr, Query, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::catalog::{from_cents, to_cents};
use crate::domain::reservation::{
    NewReservation, Reservation, ReservationQuery, ReservationRepository, ReservationStatus,
    SortKey, SortOrder, TicketLine,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{park_date, reservation, user};
use crate::shared::{is_unique_violation, InfraError, PaginatedResult};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let tickets: Vec<TicketLine> = serde_json::from_str(&m.tickets).map_err(InfraError::from)?;
    let status = ReservationStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Storage(format!("unknown status '{}' on reservation {}", m.status, m.id))
    })?;
    Ok(Reservation {
        id: m.id,
        reservation_number: m.reservation_number,
        user_id: m.user_id,
        date_id: m.date_id,
        tickets,
        total_amount: from_cents(m.total_cents),
        status,
        cancelled_at: m.cancelled_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn models_to_domain(models: Vec<reservation::Model>) -> DomainResult<Vec<Reservation>> {
    models.into_iter().map(model_to_domain).collect()
}

/// True when one ticket line of the serialized array has exactly this type.
fn has_ticket_type(ticket_type: &str) -> SimpleExpr {
    Expr::cust_with_values(
        r#"EXISTS (SELECT 1 FROM json_each("reservations"."tickets") AS line
            WHERE json_extract(line.value, '$.ticket_type') = ?)"#,
        [ticket_type],
    )
}

const LIKE_ESCAPE: char = '!';

/// `%term%`, with LIKE wildcards inside `term` matched literally.
fn contains_pattern(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

fn sql_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

fn search_condition(term: &str) -> Condition {
    let owners = Query::select()
        .column(user::Column::Id)
        .from(user::Entity)
        .cond_where(
            Condition::any()
                .add(user::Column::Email.like(contains_pattern(term)))
                .add(user::Column::Username.like(contains_pattern(term))),
        )
        .to_owned();

    let mut any = Condition::any()
        .add(reservation::Column::ReservationNumber.like(contains_pattern(term)))
        .add(reservation::Column::UserId.in_subquery(owners));

    let statuses = ReservationStatus::matching_keyword(term);
    if !statuses.is_empty() {
        any = any.add(reservation::Column::Status.is_in(statuses.iter().map(|s| s.as_str())));
    }
    any
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation> {
        debug!(
            number = %new.reservation_number,
            user_id = new.user_id,
            date_id = new.date_id,
            "Saving reservation"
        );
        let now = Utc::now();
        let tickets = serde_json::to_string(&new.tickets).map_err(InfraError::from)?;

        let model = reservation::ActiveModel {
            reservation_number: Set(new.reservation_number),
            user_id: Set(new.user_id),
            date_id: Set(new.date_id),
            tickets: Set(tickets),
            total_cents: Set(to_cents(new.total_amount)?),
            status: Set(ReservationStatus::Pending.as_str().to_string()),
            cancelled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("reservation number already exists".to_string())
            } else {
                db_err(e)
            }
        })?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_user(&self, user_id: i32) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn search(&self, q: &ReservationQuery) -> DomainResult<PaginatedResult<Reservation>> {
        let mut condition = Condition::all();

        if let Some(user_id) = q.user_id {
            condition = condition.add(reservation::Column::UserId.eq(user_id));
        }
        if let Some(status) = q.status {
            condition = condition.add(reservation::Column::Status.eq(status.as_str()));
        }
        if let Some(ticket_type) = q.ticket_type.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            condition = condition.add(has_ticket_type(ticket_type));
        }
        if let Some(from) = q.date_from {
            condition = condition.add(park_date::Column::Day.gte(from));
        }
        if let Some(to) = q.date_to {
            condition = condition.add(park_date::Column::Day.lte(to));
        }
        if let Some(term) = q.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            condition = condition.add(search_condition(term));
        }

        let query = reservation::Entity::find()
            .join(JoinType::InnerJoin, reservation::Relation::ParkDate.def())
            .filter(condition);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let query = match q.sort {
            SortKey::Created => query.order_by(reservation::Column::CreatedAt, sql_order(q.order)),
            SortKey::Date => query.order_by(park_date::Column::Day, sql_order(q.order)),
            SortKey::Amount => query.order_by(reservation::Column::TotalCents, sql_order(q.order)),
            SortKey::Status => query.order_by(reservation::Column::Status, sql_order(q.order)),
            SortKey::Number => {
                query.order_by(reservation::Column::ReservationNumber, sql_order(q.order))
            }
        };

        let models = query
            .order_by(reservation::Column::Id, sql_order(q.order))
            .offset(q.page.offset())
            .limit(q.page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(models_to_domain(models)?, total, q.page))
    }

    async fn update_status(&self, r: &Reservation) -> DomainResult<()> {
        debug!(id = r.id, status = %r.status, "Updating reservation status");

        let result = reservation::Entity::update_many()
            .col_expr(reservation::Column::Status, Expr::value(r.status.as_str()))
            .col_expr(reservation::Column::CancelledAt, Expr::value(r.cancelled_at))
            .col_expr(reservation::Column::UpdatedAt, Expr::value(r.updated_at))
            .filter(reservation::Column::Id.eq(r.id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("reservation {} not found", r.id)));
        }
        Ok(())
    }

    async fn purge_cancelled_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64> {
        let result = reservation::Entity::delete_many()
            .filter(reservation::Column::Status.eq(ReservationStatus::Cancelled.as_str()))
            .filter(reservation::Column::CancelledAt.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
