//! Identity module — registration & authentication

pub mod service;

pub use service::{AdminBootstrap, AuthResult, UserService};
