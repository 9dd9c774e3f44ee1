use super::{DishCatalog, DishPage, DishQuery, SortField, SortOrder};
use crate::dish::{Course, Dish, FlavorProfile, NewDish};
use crate::error::CatalogError;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use uuid::Uuid;

/// A catalog held entirely in memory.
///
/// Text search approximates a full-text index: a dish scores one point for
/// every whole-word occurrence of a query term in its name, ingredients,
/// region or state.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    dishes: Vec<Dish>,
}

impl MemoryCatalog {
    pub fn new(dishes: Vec<Dish>) -> Self {
        Self { dishes }
    }

    /// Assign fresh ids and timestamps, as a store would on insert.
    pub fn from_new_dishes(dishes: Vec<NewDish>) -> Self {
        let now = Utc::now();
        Self::new(
            dishes
                .into_iter()
                .map(|d| d.into_dish(Uuid::new_v4(), now))
                .collect(),
        )
    }

    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }
}

fn compare_field(a: &Dish, b: &Dish, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Ingredients => a.ingredients.cmp(&b.ingredients),
        SortField::Diet => a.diet.as_str().cmp(b.diet.as_str()),
        SortField::PrepTime => a.prep_time.cmp(&b.prep_time),
        SortField::CookTime => a.cook_time.cmp(&b.cook_time),
        SortField::FlavorProfile => a
            .flavor_profile
            .map(FlavorProfile::as_str)
            .cmp(&b.flavor_profile.map(FlavorProfile::as_str)),
        SortField::Course => a.course.as_str().cmp(b.course.as_str()),
        SortField::State => a.state.cmp(&b.state),
        SortField::Region => a
            .region
            .map(|r| r.as_str())
            .cmp(&b.region.map(|r| r.as_str())),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn relevance(dish: &Dish, terms: &BTreeSet<String>) -> usize {
    let fields = std::iter::once(dish.name.as_str())
        .chain(dish.ingredients.iter().map(String::as_str))
        .chain(dish.region.map(|r| r.as_str()))
        .chain(dish.state.as_deref());

    fields
        .flat_map(words)
        .filter(|word| terms.contains(word))
        .count()
}

impl DishCatalog for MemoryCatalog {
    fn list(&self, query: &DishQuery) -> Result<DishPage, CatalogError> {
        let mut matching: Vec<&Dish> = self
            .dishes
            .iter()
            .filter(|d| query.filter.matches(d))
            .collect();

        matching.sort_by(|a, b| {
            let by_field = compare_field(a, b, query.sort_by);
            let by_field = match query.order {
                SortOrder::Asc => by_field,
                SortOrder::Desc => by_field.reverse(),
            };
            by_field.then_with(|| a.id.cmp(&b.id))
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(DishPage { items, total })
    }

    fn get(&self, id: Uuid) -> Result<Option<Dish>, CatalogError> {
        Ok(self.dishes.iter().find(|d| d.id == id).cloned())
    }

    fn text_search(&self, query: &str, limit: usize) -> Result<Vec<Dish>, CatalogError> {
        let terms: BTreeSet<String> = words(query).collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, &Dish)> = self
            .dishes
            .iter()
            .map(|d| (relevance(d, &terms), d))
            .filter(|(score, _)| *score > 0)
            .collect();

        scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| a.name.cmp(&b.name)));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, d)| d.clone())
            .collect())
    }

    fn ingredient_search(
        &self,
        needle: &str,
        exclude: &[Uuid],
        limit: usize,
    ) -> Result<Vec<Dish>, CatalogError> {
        let needle = needle.to_lowercase();

        let mut found: Vec<&Dish> = self
            .dishes
            .iter()
            .filter(|d| !exclude.contains(&d.id))
            .filter(|d| {
                d.ingredients
                    .iter()
                    .any(|i| i.to_lowercase().contains(&needle))
            })
            .collect();

        found.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(found.into_iter().take(limit).cloned().collect())
    }

    fn all_dishes(&self) -> Result<Vec<Dish>, CatalogError> {
        Ok(self.dishes.clone())
    }

    fn distinct_ingredients(&self) -> Result<Vec<String>, CatalogError> {
        let distinct: BTreeSet<&str> = self
            .dishes
            .iter()
            .flat_map(|d| d.ingredients.iter().map(String::as_str))
            .collect();
        Ok(distinct.into_iter().map(str::to_string).collect())
    }

    fn distinct_courses(&self) -> Result<Vec<Course>, CatalogError> {
        let mut courses: Vec<Course> = Vec::new();
        for dish in &self.dishes {
            if !courses.contains(&dish.course) {
                courses.push(dish.course);
            }
        }
        courses.sort_by_key(|c| c.as_str());
        Ok(courses)
    }

    fn distinct_flavor_profiles(&self) -> Result<Vec<FlavorProfile>, CatalogError> {
        let mut flavors: Vec<FlavorProfile> = Vec::new();
        for flavor in self.dishes.iter().filter_map(|d| d.flavor_profile) {
            if !flavors.contains(&flavor) {
                flavors.push(flavor);
            }
        }
        flavors.sort_by_key(|f| f.as_str());
        Ok(flavors)
    }
}
