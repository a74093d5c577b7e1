//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, validated JSON
//! - `middleware`: bearer JWT authentication and the staff guard
//! - `modules`: DTOs and handlers per resource
//! - `router`: route table and Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use router::{create_api_router, ApiDoc};
pub use state::AppState;
