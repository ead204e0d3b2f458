//! In-memory adapter for scheduling persistence.

mod repository;

pub use repository::InMemoryShopRepository;
