//! Read access to the dish catalog.
//!
//! The HTTP layer and the matcher only ever see a `DishCatalog`. The
//! PostgreSQL implementation lives in `thali-store`; `MemoryCatalog` backs
//! tests and offline tooling.

mod memory;

pub use memory::MemoryCatalog;

use crate::dish::{Course, Diet, Dish, FlavorProfile};
use crate::error::{CatalogError, ParseEnumError};
use std::str::FromStr;
use uuid::Uuid;

/// Field a dish listing can be ordered by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    #[default]
    Name,
    Ingredients,
    Diet,
    PrepTime,
    CookTime,
    FlavorProfile,
    Course,
    State,
    Region,
    CreatedAt,
    UpdatedAt,
}

impl FromStr for SortField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" | "_id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "ingredients" => Ok(Self::Ingredients),
            "diet" => Ok(Self::Diet),
            "prep_time" => Ok(Self::PrepTime),
            "cook_time" => Ok(Self::CookTime),
            "flavor_profile" => Ok(Self::FlavorProfile),
            "course" => Ok(Self::Course),
            "state" => Ok(Self::State),
            "region" => Ok(Self::Region),
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            _ => Err(ParseEnumError {
                kind: "sort field",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseEnumError {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

/// Filters for a dish listing. Empty sets mean "no restriction".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DishFilter {
    pub diet: Option<Diet>,
    pub courses: Vec<Course>,
    pub flavor_profiles: Vec<FlavorProfile>,
}

impl DishFilter {
    pub fn matches(&self, dish: &Dish) -> bool {
        if let Some(diet) = self.diet {
            if dish.diet != diet {
                return false;
            }
        }

        if !self.courses.is_empty() && !self.courses.contains(&dish.course) {
            return false;
        }

        if !self.flavor_profiles.is_empty() {
            match dish.flavor_profile {
                Some(flavor) if self.flavor_profiles.contains(&flavor) => {}
                _ => return false,
            }
        }

        true
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishQuery {
    pub filter: DishFilter,
    pub sort_by: SortField,
    pub order: SortOrder,
    /// 1-based page number
    pub page: u32,
    /// Page size, at least 1
    pub limit: u32,
}

impl Default for DishQuery {
    fn default() -> Self {
        Self {
            filter: DishFilter::default(),
            sort_by: SortField::default(),
            order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DishQuery {
    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of a listing plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct DishPage {
    pub items: Vec<Dish>,
    pub total: u64,
}

/// Everything the API needs from the dish store.
///
/// Implementations must be cheap to share across requests; each call is
/// independent and read-only.
pub trait DishCatalog: Send + Sync {
    /// Filter, sort, and paginate. Ties on the sort field are broken by id.
    fn list(&self, query: &DishQuery) -> Result<DishPage, CatalogError>;

    fn get(&self, id: Uuid) -> Result<Option<Dish>, CatalogError>;

    /// The store's own relevance-ranked text search over name, ingredients,
    /// region and state.
    fn text_search(&self, query: &str, limit: usize) -> Result<Vec<Dish>, CatalogError>;

    /// Dishes with at least one ingredient containing `needle`
    /// (case-insensitive), skipping `exclude`, ordered by name.
    fn ingredient_search(
        &self,
        needle: &str,
        exclude: &[Uuid],
        limit: usize,
    ) -> Result<Vec<Dish>, CatalogError>;

    /// The whole catalog, unpaginated.
    fn all_dishes(&self) -> Result<Vec<Dish>, CatalogError>;

    /// Every ingredient token as stored, in no particular order.
    fn distinct_ingredients(&self) -> Result<Vec<String>, CatalogError>;

    fn distinct_courses(&self) -> Result<Vec<Course>, CatalogError>;

    /// Observed flavor profiles, excluding dishes without one.
    fn distinct_flavor_profiles(&self) -> Result<Vec<FlavorProfile>, CatalogError>;
}
