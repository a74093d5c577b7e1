//! Fixtures shared by service tests: a migrated in-memory database,
//! helpers to seed users and catalog rows, and repositories that inject
//! store conflicts.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::catalog::{CatalogRepository, NewParkDate, NewPrice, ParkDate, Price};
use crate::domain::conversation::{
    Conversation, ConversationRepository, ConversationStatus, NewConversation,
};
use crate::domain::identity::Role;
use crate::domain::message::MessageRepository;
use crate::domain::reservation::{NewReservation, Reservation, ReservationQuery, ReservationRepository};
use crate::domain::user::{NewUser, User, UserRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::PaginatedResult;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::test_database;

pub async fn repos() -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(test_database().await))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn seed_user(repos: &Arc<dyn RepositoryProvider>, name: &str, role: Role) -> User {
    repos
        .users()
        .create(NewUser {
            username: name.to_string(),
            email: format!("{name}@park.test"),
            password_hash: "not-a-real-hash".to_string(),
            role,
        })
        .await
        .unwrap()
}

/// Park day `offset` days from today.
pub async fn seed_day(repos: &Arc<dyn RepositoryProvider>, offset: i64, is_open: bool) -> ParkDate {
    repos
        .catalog()
        .create_park_date(NewParkDate {
            day: today() + Duration::days(offset),
            is_open,
            open_hour: None,
            close_hour: None,
            notes: None,
        })
        .await
        .unwrap()
}

pub async fn seed_price(
    repos: &Arc<dyn RepositoryProvider>,
    label: &str,
    ticket_type: &str,
    amount: &str,
) -> Price {
    repos
        .catalog()
        .create_price(NewPrice {
            label: label.to_string(),
            ticket_type: ticket_type.to_string(),
            amount: dec(amount),
            duration_days: 1,
        })
        .await
        .unwrap()
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ── Conflict injection ──────────────────────────────────────────

/// Reservation store whose first `collisions` inserts fail with a
/// duplicate reservation number.
pub struct CollidingReservations {
    inner: Arc<dyn RepositoryProvider>,
    collisions: AtomicUsize,
    pub attempts: AtomicUsize,
}

#[async_trait]
impl ReservationRepository for CollidingReservations {
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let left = self.collisions.load(Ordering::SeqCst);
        if left > 0 {
            self.collisions.store(left - 1, Ordering::SeqCst);
            return Err(DomainError::Conflict("reservation number already used".into()));
        }
        self.inner.reservations().create(new).await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        self.inner.reservations().find_by_id(id).await
    }

    async fn find_by_user(&self, user_id: i32) -> DomainResult<Vec<Reservation>> {
        self.inner.reservations().find_by_user(user_id).await
    }

    async fn search(&self, query: &ReservationQuery) -> DomainResult<PaginatedResult<Reservation>> {
        self.inner.reservations().search(query).await
    }

    async fn update_status(&self, reservation: &Reservation) -> DomainResult<()> {
        self.inner.reservations().update_status(reservation).await
    }

    async fn purge_cancelled_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64> {
        self.inner.reservations().purge_cancelled_before(cutoff).await
    }
}

/// Conversation store where another request always wins the insert: the
/// row is written, then the caller gets the unique-index `Conflict`.
pub struct RacingConversations {
    inner: Arc<dyn RepositoryProvider>,
}

#[async_trait]
impl ConversationRepository for RacingConversations {
    async fn create(&self, new: NewConversation) -> DomainResult<Conversation> {
        self.inner.conversations().create(new).await?;
        Err(DomainError::Conflict(
            "an open conversation already exists for this pair".into(),
        ))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Conversation>> {
        self.inner.conversations().find_by_id(id).await
    }

    async fn find_open_for_pair(
        &self,
        user_id: i32,
        admin_id: i32,
    ) -> DomainResult<Option<Conversation>> {
        self.inner.conversations().find_open_for_pair(user_id, admin_id).await
    }

    async fn list_for_customer(&self, user_id: i32) -> DomainResult<Vec<Conversation>> {
        self.inner.conversations().list_for_customer(user_id).await
    }

    async fn list_for_staff(&self, admin_id: i32) -> DomainResult<Vec<Conversation>> {
        self.inner.conversations().list_for_staff(admin_id).await
    }

    async fn update_status(&self, id: i32, status: ConversationStatus) -> DomainResult<()> {
        self.inner.conversations().update_status(id, status).await
    }

    async fn touch(&self, id: i32) -> DomainResult<()> {
        self.inner.conversations().touch(id).await
    }
}

/// Real repositories, with reservations or conversations swapped out.
pub struct StubbedProvider {
    inner: Arc<dyn RepositoryProvider>,
    reservations: Option<CollidingReservations>,
    conversations: Option<RacingConversations>,
}

impl StubbedProvider {
    pub fn colliding_reservations(inner: Arc<dyn RepositoryProvider>, collisions: usize) -> Self {
        Self {
            reservations: Some(CollidingReservations {
                inner: inner.clone(),
                collisions: AtomicUsize::new(collisions),
                attempts: AtomicUsize::new(0),
            }),
            conversations: None,
            inner,
        }
    }

    pub fn racing_conversations(inner: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            reservations: None,
            conversations: Some(RacingConversations {
                inner: inner.clone(),
            }),
            inner,
        }
    }

    /// Insert attempts seen by the colliding reservation store.
    pub fn reservation_attempts(&self) -> usize {
        self.reservations
            .as_ref()
            .map_or(0, |r| r.attempts.load(Ordering::SeqCst))
    }
}

impl RepositoryProvider for StubbedProvider {
    fn users(&self) -> &dyn UserRepository {
        self.inner.users()
    }

    fn catalog(&self) -> &dyn CatalogRepository {
        self.inner.catalog()
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        match &self.reservations {
            Some(r) => r,
            None => self.inner.reservations(),
        }
    }

    fn conversations(&self) -> &dyn ConversationRepository {
        match &self.conversations {
            Some(c) => c,
            None => self.inner.conversations(),
        }
    }

    fn messages(&self) -> &dyn MessageRepository {
        self.inner.messages()
    }
}
