//! Read operations exposed by the API, expressed against any [`DishCatalog`].

use crate::catalog::{DishCatalog, DishQuery};
use crate::dish::{Course, Diet, Dish, FlavorProfile};
use crate::error::{CatalogError, MatchError};
use crate::matcher::{match_dishes, MatchResult, Pantry};
use serde::Serialize;
use std::collections::BTreeSet;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum number of dishes a free-text search returns.
pub const SEARCH_LIMIT: usize = 10;

/// One page of a dish listing with pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DishListing {
    pub items: Vec<Dish>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

pub fn list_dishes(
    catalog: &dyn DishCatalog,
    query: &DishQuery,
) -> Result<DishListing, CatalogError> {
    let page = catalog.list(query)?;
    let limit = u64::from(query.limit.max(1));

    Ok(DishListing {
        total_pages: page.total.div_ceil(limit),
        total: page.total,
        items: page.items,
        current_page: query.page,
    })
}

/// Free-text search.
///
/// Takes the store's relevance-ranked hits first. When those do not fill
/// [`SEARCH_LIMIT`], tops up with dishes whose ingredients contain the query
/// as a substring, alphabetically.
pub fn search_dishes(catalog: &dyn DishCatalog, query: &str) -> Result<Vec<Dish>, CatalogError> {
    let mut results = catalog.text_search(query, SEARCH_LIMIT)?;
    results.truncate(SEARCH_LIMIT);

    if results.len() < SEARCH_LIMIT {
        let found: Vec<Uuid> = results.iter().map(|d| d.id).collect();
        let remaining = SEARCH_LIMIT - results.len();
        let extra = catalog.ingredient_search(query, &found, remaining)?;

        tracing::debug!(
            text_hits = results.len(),
            ingredient_hits = extra.len(),
            "search supplemented with ingredient matches"
        );

        results.extend(extra.into_iter().take(remaining));
    }

    Ok(results)
}

/// Every ingredient in the catalog, trimmed, deduplicated and sorted.
///
/// Sorting ignores case first so "amchur" and "Almonds" sit together, then
/// falls back to the exact text for a stable order.
pub fn all_ingredients(catalog: &dyn DishCatalog) -> Result<Vec<String>, CatalogError> {
    let distinct: BTreeSet<String> = catalog
        .distinct_ingredients()?
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();

    let mut ingredients: Vec<String> = distinct.into_iter().collect();
    ingredients.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    Ok(ingredients)
}

/// Values a client can offer as listing filters.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FilterOptions {
    /// Always both diets, whether or not the catalog uses them
    pub diets: Vec<Diet>,
    pub courses: Vec<Course>,
    pub flavor_profiles: Vec<FlavorProfile>,
}

pub fn filter_options(catalog: &dyn DishCatalog) -> Result<FilterOptions, CatalogError> {
    Ok(FilterOptions {
        diets: Diet::ALL.to_vec(),
        courses: catalog.distinct_courses()?,
        flavor_profiles: catalog.distinct_flavor_profiles()?,
    })
}

/// Rank the catalog against the caller's pantry.
///
/// The pantry is validated before the catalog is touched; catalog failures
/// are returned as [`MatchError::StoreUnavailable`].
pub fn find_dishes_by_ingredients<S: AsRef<str>>(
    catalog: &dyn DishCatalog,
    ingredients: &[S],
) -> Result<Vec<MatchResult>, MatchError> {
    let pantry = Pantry::new(ingredients)?;
    let dishes = catalog.all_dishes()?;

    let results = match_dishes(&dishes, &pantry);
    tracing::debug!(
        pantry_size = pantry.len(),
        catalog_size = dishes.len(),
        matches = results.len(),
        "matched pantry against catalog"
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DishFilter, DishPage, MemoryCatalog};
    use crate::dish::NewDish;

    /// A catalog whose backing store is down.
    struct DownCatalog;

    impl DishCatalog for DownCatalog {
        fn list(&self, _: &DishQuery) -> Result<DishPage, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
        fn get(&self, _: Uuid) -> Result<Option<Dish>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
        fn text_search(&self, _: &str, _: usize) -> Result<Vec<Dish>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
        fn ingredient_search(
            &self,
            _: &str,
            _: &[Uuid],
            _: usize,
        ) -> Result<Vec<Dish>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
        fn all_dishes(&self) -> Result<Vec<Dish>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
        fn distinct_ingredients(&self) -> Result<Vec<String>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
        fn distinct_courses(&self) -> Result<Vec<Course>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
        fn distinct_flavor_profiles(&self) -> Result<Vec<FlavorProfile>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
    }

    fn names(dishes: &[Dish]) -> Vec<&str> {
        dishes.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let catalog = MemoryCatalog::from_new_dishes(
            (0..21)
                .map(|i| NewDish::new(format!("Dish {i:02}"), &["Rice"]))
                .collect(),
        );
        let query = DishQuery {
            page: 3,
            limit: 10,
            ..Default::default()
        };
        let listing = list_dishes(&catalog, &query).unwrap();
        assert_eq!(listing.total, 21);
        assert_eq!(listing.total_pages, 3);
        assert_eq!(listing.current_page, 3);
        assert_eq!(names(&listing.items), vec!["Dish 20"]);
    }

    #[test]
    fn test_empty_listing_has_zero_pages() {
        let catalog = MemoryCatalog::default();
        let query = DishQuery {
            filter: DishFilter {
                diet: Some(Diet::NonVegetarian),
                ..Default::default()
            },
            ..Default::default()
        };
        let listing = list_dishes(&catalog, &query).unwrap();
        assert_eq!(listing.total_pages, 0);
        assert!(listing.items.is_empty());
    }

    #[test]
    fn test_search_ranks_text_hits_by_relevance() {
        let catalog = MemoryCatalog::from_new_dishes(vec![
            NewDish::new("Paneer tikka", &["Paneer", "Yogurt"]),
            NewDish::new("Shahi paneer", &["Paneer", "Cream"]),
            NewDish::new("Malai kofta", &["Paneer cubes", "Potato"]),
            NewDish::new("Dal makhani", &["Urad dal", "Cream"]),
        ]);

        let results = search_dishes(&catalog, "paneer").unwrap();
        assert_eq!(
            names(&results),
            vec!["Paneer tikka", "Shahi paneer", "Malai kofta"]
        );
    }

    #[test]
    fn test_search_substring_finds_partial_words() {
        let catalog = MemoryCatalog::from_new_dishes(vec![
            NewDish::new("Pongal", &["Moong dal", "Rice"]),
            NewDish::new("Khichdi", &["Moong dal", "Rice", "Ghee"]),
        ]);
        let results = search_dishes(&catalog, "moon").unwrap();
        assert_eq!(names(&results), vec!["Khichdi", "Pongal"]);
    }

    #[test]
    fn test_search_is_capped() {
        let catalog = MemoryCatalog::from_new_dishes(
            (0..15)
                .map(|i| NewDish::new(format!("Curry {i:02}"), &["Onion"]))
                .collect(),
        );
        assert_eq!(search_dishes(&catalog, "onion").unwrap().len(), SEARCH_LIMIT);
    }

    #[test]
    fn test_all_ingredients_trims_and_dedupes() {
        let catalog = MemoryCatalog::from_new_dishes(vec![
            NewDish::new("A", &["Sugar ", "amchur"]),
            NewDish::new("B", &["Sugar", "  ", "Almonds"]),
        ]);
        assert_eq!(
            all_ingredients(&catalog).unwrap(),
            vec!["Almonds", "amchur", "Sugar"]
        );
    }

    #[test]
    fn test_filter_options_always_lists_both_diets() {
        let catalog = MemoryCatalog::from_new_dishes(vec![
            NewDish::new("Kheer", &["Milk"]).with_course(Course::Dessert)
        ]);
        let options = filter_options(&catalog).unwrap();
        assert_eq!(options.diets, vec![Diet::Vegetarian, Diet::NonVegetarian]);
        assert_eq!(options.courses, vec![Course::Dessert]);
        assert!(options.flavor_profiles.is_empty());
    }

    #[test]
    fn test_match_validates_before_touching_store() {
        let err = find_dishes_by_ingredients(&DownCatalog, &["  "]).unwrap_err();
        assert!(matches!(err, MatchError::InvalidInput));
    }

    #[test]
    fn test_match_propagates_store_failure() {
        let err = find_dishes_by_ingredients(&DownCatalog, &["rice"]).unwrap_err();
        assert!(matches!(
            err,
            MatchError::StoreUnavailable(CatalogError::Unavailable(_))
        ));
    }

    #[test]
    fn test_search_propagates_store_failure() {
        assert!(search_dishes(&DownCatalog, "rice").is_err());
        assert!(filter_options(&DownCatalog).is_err());
        assert!(all_ingredients(&DownCatalog).is_err());
    }
}
