//! Catalog aggregate
//!
//! Park days and price-list records. Read-only to the booking core.

pub mod model;
pub mod repository;

pub use model::{from_cents, to_cents, NewParkDate, NewPrice, ParkDate, Price, PriceChanges};
pub use repository::CatalogRepository;
