//! Domain core for the Thali dish catalog.
//!
//! - `dish`: the catalog record and its enums
//! - `catalog`: the `DishCatalog` trait, typed list queries, and an in-memory catalog
//! - `matcher`: ranks dishes by how much of their ingredient list a pantry covers
//! - `service`: the read paths the HTTP layer exposes
//! - `import`: CSV to `NewDish` transform used by the importer

pub mod catalog;
pub mod dish;
pub mod error;
pub mod import;
pub mod matcher;
pub mod service;

pub use catalog::{
    DishCatalog, DishFilter, DishPage, DishQuery, MemoryCatalog, SortField, SortOrder,
};
pub use dish::{Course, Diet, Dish, FlavorProfile, NewDish, Region};
pub use error::{CatalogError, ImportError, MatchError, ParseEnumError};
pub use matcher::{match_dishes, MatchResult, Pantry, MAX_MATCHES};
pub use service::{DishListing, FilterOptions, SEARCH_LIMIT};
