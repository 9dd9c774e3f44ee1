//! PostgreSQL-backed dish catalog.
//!
//! Dishes live in a single `dishes` table; migrations are embedded and run
//! when the pool is created.

mod catalog;
pub mod db;
mod models;
mod raw_sql;
pub mod schema;

pub use catalog::PgCatalog;
pub use db::{create_pool, DbPool, StoreError};
