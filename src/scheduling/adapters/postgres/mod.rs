//! `PostgreSQL` adapters for scheduling persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresShopRepository, ShopPgPool, build_pool};
