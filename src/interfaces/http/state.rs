//! Shared state handed to every HTTP handler

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::application::{
    BookingPolicy, CatalogService, ConversationRegistry, MessageRouter, ReservationEngine,
    UserService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::interfaces::http::middleware::AuthState;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub users: Arc<UserService>,
    pub catalog: Arc<CatalogService>,
    pub reservations: Arc<ReservationEngine>,
    pub conversations: Arc<ConversationRegistry>,
    pub messages: Arc<MessageRouter>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt_config: JwtConfig, policy: BookingPolicy) -> Self {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        Self {
            users: Arc::new(UserService::new(repos.clone(), jwt_config.clone())),
            catalog: Arc::new(CatalogService::new(repos.clone())),
            reservations: Arc::new(ReservationEngine::new(repos.clone(), policy)),
            conversations: Arc::new(ConversationRegistry::new(repos.clone())),
            messages: Arc::new(MessageRouter::new(repos)),
            db,
            jwt_config,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        AuthState {
            jwt_config: s.jwt_config.clone(),
        }
    }
}
