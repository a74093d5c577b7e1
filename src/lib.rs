//! # Park service
//!
//! Theme-park ticketing and customer-support messaging backend.
//!
//! ## Architecture
//!
//! - **domain**: entities, value types, authorization predicates and
//!   repository traits
//! - **application**: use cases (booking, support, catalog, identity)
//! - **infrastructure**: SeaORM persistence, JWT and password hashing
//! - **interfaces**: the axum REST API with Swagger documentation
//! - **server**: process lifecycle shared by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::create_api_router;
