//! API router with Swagger UI

use axum::{
    handler::Handler,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationMeta};
use crate::interfaces::http::middleware::{auth_middleware, require_staff, AuthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{
    auth, catalog, conversations, health, messages, reservations,
};
use crate::interfaces::http::state::AppState;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        // Reservations
        reservations::create_reservation,
        reservations::list_my_reservations,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::update_reservation_status,
        reservations::cancel_reservation,
        // Conversations
        conversations::list_conversations,
        conversations::create_conversation,
        conversations::get_conversation,
        conversations::update_conversation_status,
        // Messages
        messages::post_message,
        messages::list_messages,
        messages::mark_conversation_read,
        messages::mark_message_read,
        messages::unread_count,
        messages::delete_message,
        // Catalog
        catalog::list_park_dates,
        catalog::create_park_date,
        catalog::list_prices,
        catalog::create_price,
        catalog::update_price,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginationMeta,
            PaginatedResponse<reservations::ReservationDto>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            reservations::CreateReservationRequest,
            reservations::TicketRequestDto,
            reservations::UpdateReservationStatusRequest,
            reservations::ReservationDto,
            reservations::TicketLineDto,
            reservations::ParkDateDto,
            conversations::CreateConversationRequest,
            conversations::UpdateConversationStatusRequest,
            conversations::ConversationDto,
            conversations::ConversationSummaryDto,
            conversations::ConversationDetailDto,
            messages::PostMessageRequest,
            messages::MessageDto,
            messages::PostedMessageDto,
            messages::MarkedReadDto,
            messages::UnreadCountDto,
            catalog::CreateParkDateRequest,
            catalog::CreatePriceRequest,
            catalog::UpdatePriceRequest,
            catalog::PriceDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Registration, login (JWT) and the current account"),
        (name = "Reservations", description = "Ticket booking, listing and cancellation"),
        (name = "Conversations", description = "Support threads between a visitor and a staff member"),
        (name = "Messages", description = "Messages inside support threads, read receipts"),
        (name = "Catalog", description = "Park opening days and ticket prices"),
    ),
    info(
        title = "Park Service API",
        version = "1.0.0",
        description = "Theme-park ticketing and customer-support messaging",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the full application router.
pub fn create_api_router(state: AppState, prometheus: PrometheusHandle) -> Router {
    let auth_state = AuthState {
        jwt_config: state.jwt_config.clone(),
    };
    let authenticated = middleware::from_fn_with_state(auth_state, auth_middleware);
    let staff = || middleware::from_fn(require_staff);

    // Login and registration are public
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/me", get(auth::get_current_user.layer(authenticated.clone())));

    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservations::list_reservations.layer(staff()))
                .post(reservations::create_reservation),
        )
        .route("/mine", get(reservations::list_my_reservations))
        .route(
            "/{id}",
            get(reservations::get_reservation).delete(reservations::cancel_reservation),
        )
        .route(
            "/{id}/status",
            patch(reservations::update_reservation_status.layer(staff())),
        )
        .layer(authenticated.clone());

    let conversation_routes = Router::new()
        .route(
            "/",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route("/{id}", get(conversations::get_conversation))
        .route(
            "/{id}/status",
            patch(conversations::update_conversation_status.layer(staff())),
        )
        .route("/{id}/messages", get(messages::list_messages))
        .route("/{id}/read", post(messages::mark_conversation_read))
        .layer(authenticated.clone());

    let message_routes = Router::new()
        .route("/", post(messages::post_message))
        .route("/unread-count", get(messages::unread_count))
        .route("/{id}", delete(messages::delete_message))
        .route("/{id}/read", post(messages::mark_message_read))
        .layer(authenticated.clone());

    let catalog_routes = Router::new()
        .route(
            "/dates",
            get(catalog::list_park_dates).post(catalog::create_park_date.layer(staff())),
        )
        .route(
            "/prices",
            get(catalog::list_prices).post(catalog::create_price.layer(staff())),
        )
        .route("/prices/{id}", put(catalog::update_price.layer(staff())))
        .layer(authenticated);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState { handle: prometheus });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/conversations", conversation_routes)
        .nest("/api/v1/messages", message_routes)
        .nest("/api/v1/catalog", catalog_routes)
        .with_state(state)
        .merge(metrics_routes)
        .merge(swagger_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use chrono::{Duration, Local};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::{AdminBootstrap, BookingPolicy};
    use crate::infrastructure::crypto::jwt::JwtConfig;
    use crate::infrastructure::database::test_database;

    struct TestApp {
        router: Router,
        state: AppState,
    }

    impl TestApp {
        async fn new() -> Self {
            let state = AppState::new(
                test_database().await,
                JwtConfig::new("router-test-secret", 1),
                BookingPolicy::default(),
            );
            let handle = PrometheusBuilder::new().build_recorder().handle();
            Self {
                router: create_api_router(state.clone(), handle),
                state,
            }
        }

        async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("authorization", format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn token_for(&self, username: &str, password: &str) -> String {
            let resp = self
                .send(
                    Method::POST,
                    "/api/v1/auth/login",
                    None,
                    Some(json!({"username": username, "password": password})),
                )
                .await;
            assert_eq!(resp.status(), StatusCode::OK);
            body_json(resp).await["data"]["token"]
                .as_str()
                .unwrap()
                .to_string()
        }

        async fn customer_token(&self, username: &str) -> String {
            self.state
                .users
                .register(username, &format!("{username}@park.test"), "password123")
                .await
                .unwrap();
            self.token_for(username, "password123").await
        }

        async fn admin_token(&self) -> String {
            self.state
                .users
                .ensure_admin(&AdminBootstrap {
                    username: "admin".into(),
                    email: "admin@park.test".into(),
                    password: "admin-password".into(),
                })
                .await
                .unwrap();
            self.token_for("admin", "admin-password").await
        }
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_database_ok() {
        let app = TestApp::new().await;
        let resp = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        assert_eq!(body_json(resp).await["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = TestApp::new().await;
        let resp = app
            .send(Method::GET, "/api/v1/reservations/mine", None, None)
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app
            .send(Method::GET, "/api/v1/auth/me", Some("garbage"), None)
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn staff_routes_reject_customers() {
        let app = TestApp::new().await;
        let token = app.customer_token("alice").await;

        let resp = app
            .send(Method::GET, "/api/v1/reservations", Some(&token), None)
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app
            .send(
                Method::POST,
                "/api/v1/catalog/prices",
                Some(&token),
                Some(json!({"label": "Adult", "ticket_type": "ADULT", "amount": "25.00"})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn booking_flow_over_http() {
        let app = TestApp::new().await;
        let admin = app.admin_token().await;
        let alice = app.customer_token("alice").await;

        let day = (Local::now().date_naive() + Duration::days(20)).to_string();
        let resp = app
            .send(
                Method::POST,
                "/api/v1/catalog/dates",
                Some(&admin),
                Some(json!({"day": day})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let date_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let resp = app
            .send(
                Method::POST,
                "/api/v1/catalog/prices",
                Some(&admin),
                Some(json!({"label": "Adult", "ticket_type": "ADULT", "amount": "25.00"})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let price_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let resp = app
            .send(
                Method::POST,
                "/api/v1/reservations",
                Some(&alice),
                Some(json!({"date_id": date_id, "tickets": [{"price_id": price_id, "quantity": 2}]})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        assert_eq!(created["total_amount"], "50.00");
        assert_eq!(created["status"], "PENDING");
        assert_eq!(created["can_cancel"], true);
        assert_eq!(created["days_until_visit"], 20);
        let id = created["id"].as_i64().unwrap();

        let resp = app
            .send(Method::GET, "/api/v1/reservations?limit=5", Some(&admin), None)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let page = body_json(resp).await;
        assert_eq!(page["pagination"]["total"], 1);
        assert_eq!(page["pagination"]["limit"], 5);
        assert_eq!(page["data"][0]["id"], id);

        let resp = app
            .send(
                Method::DELETE,
                &format!("/api/v1/reservations/{id}"),
                Some(&alice),
                None,
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "CANCELLED");
    }

    #[tokio::test]
    async fn empty_ticket_list_is_unprocessable() {
        let app = TestApp::new().await;
        let alice = app.customer_token("alice").await;
        let resp = app
            .send(
                Method::POST,
                "/api/v1/reservations",
                Some(&alice),
                Some(json!({"date_id": 1, "tickets": []})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(resp).await["success"], false);
    }

    #[tokio::test]
    async fn messaging_flow_over_http() {
        let app = TestApp::new().await;
        let admin = app.admin_token().await;
        let alice = app.customer_token("alice").await;

        let resp = app
            .send(
                Method::POST,
                "/api/v1/messages",
                Some(&alice),
                Some(json!({"subject": "Lost bag", "content": "I left my bag on the ride"})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let posted = body_json(resp).await;
        assert_eq!(posted["success"], true);
        let conversation_id = posted["data"]["conversation"]["id"].as_i64().unwrap();

        let resp = app
            .send(Method::GET, "/api/v1/messages/unread-count", Some(&admin), None)
            .await;
        assert_eq!(body_json(resp).await["data"]["count"], 1);

        let resp = app
            .send(
                Method::POST,
                &format!("/api/v1/conversations/{conversation_id}/read"),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(body_json(resp).await["data"]["marked"], 1);

        let resp = app
            .send(
                Method::PATCH,
                &format!("/api/v1/conversations/{conversation_id}/status"),
                Some(&admin),
                Some(json!({"status": "CLOSED"})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .send(
                Method::POST,
                "/api/v1/messages",
                Some(&alice),
                Some(json!({"conversation_id": conversation_id, "content": "hello?"})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(resp).await["success"], false);
    }

    #[tokio::test]
    async fn unknown_conversation_is_forbidden() {
        let app = TestApp::new().await;
        let alice = app.customer_token("alice").await;
        let resp = app
            .send(Method::GET, "/api/v1/conversations/999", Some(&alice), None)
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app
            .send(Method::GET, "/api/v1/conversations/999/messages", Some(&alice), None)
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app
            .send(
                Method::POST,
                "/api/v1/messages",
                Some(&alice),
                Some(json!({"conversation_id": 999, "content": "anyone?"})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn huge_page_number_returns_an_empty_page() {
        let app = TestApp::new().await;
        let admin = app.admin_token().await;
        let uri = format!("/api/v1/reservations?page={}&limit=100", u64::MAX);
        let resp = app.send(Method::GET, &uri, Some(&admin), None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let page = body_json(resp).await;
        assert_eq!(page["data"].as_array().unwrap().len(), 0);
        assert_eq!(page["pagination"]["total"], 0);
    }
}
