//! Park days and ticket prices

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
