//! Pantry matching.
//!
//! Every dish is scored by the share of its ingredient list the pantry
//! covers. Dishes sharing no ingredient with the pantry are dropped, the rest
//! are ranked best-first and capped at [`MAX_MATCHES`].
//!
//! Comparison is case-insensitive. Ranking compares the exact ratios
//! `matched / total`; the percentage is only rounded when the result is
//! projected, so two dishes at 66.7% and 67% never tie by accident.

use crate::dish::{Course, Diet, Dish, FlavorProfile, Region};
use crate::error::MatchError;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum number of dishes a match query returns.
pub const MAX_MATCHES: usize = 10;

/// A cleaned, lower-cased set of ingredients the caller has on hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pantry(HashSet<String>);

impl Pantry {
    /// Trim and lower-case every entry, dropping blanks.
    ///
    /// Fails with [`MatchError::InvalidInput`] when nothing is left.
    pub fn new<S: AsRef<str>>(ingredients: &[S]) -> Result<Self, MatchError> {
        let cleaned: HashSet<String> = ingredients
            .iter()
            .map(|i| i.as_ref().trim().to_lowercase())
            .filter(|i| !i.is_empty())
            .collect();

        if cleaned.is_empty() {
            return Err(MatchError::InvalidInput);
        }

        Ok(Self(cleaned))
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.0.contains(ingredient)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A dish projected with its match diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MatchResult {
    pub id: Uuid,
    pub name: String,
    /// Ingredients in their stored casing
    pub ingredients: Vec<String>,
    pub diet: Diet,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub course: Course,
    pub flavor_profile: Option<FlavorProfile>,
    pub region: Option<Region>,
    pub state: Option<String>,
    /// Distinct dish ingredients found in the pantry
    #[serde(rename = "matchedIngredientsCount")]
    pub matched_ingredients_count: usize,
    /// Length of the dish's ingredient list
    #[serde(rename = "totalIngredientsCount")]
    pub total_ingredients_count: usize,
    /// Rounded to the nearest whole percent
    #[serde(rename = "matchPercentage")]
    pub match_percentage: u8,
    /// Lower-cased dish ingredients not in the pantry
    #[serde(rename = "missingIngredients")]
    pub missing_ingredients: Vec<String>,
}

struct Scored<'a> {
    dish: &'a Dish,
    matched: usize,
    total: usize,
    missing: Vec<String>,
}

impl Scored<'_> {
    /// Compare `self.matched / self.total` with `other`'s ratio without
    /// going through floating point.
    fn cmp_ratio(&self, other: &Self) -> Ordering {
        (self.matched * other.total).cmp(&(other.matched * self.total))
    }

    fn percentage(&self) -> u8 {
        let pct = (self.matched as f64 / self.total as f64) * 100.0;
        pct.round().clamp(0.0, 100.0) as u8
    }

    fn into_result(self) -> MatchResult {
        let match_percentage = self.percentage();
        let dish = self.dish;
        MatchResult {
            id: dish.id,
            name: dish.name.clone(),
            ingredients: dish.ingredients.clone(),
            diet: dish.diet,
            prep_time: dish.prep_time,
            cook_time: dish.cook_time,
            course: dish.course,
            flavor_profile: dish.flavor_profile,
            region: dish.region,
            state: dish.state.clone(),
            matched_ingredients_count: self.matched,
            total_ingredients_count: self.total,
            match_percentage,
            missing_ingredients: self.missing,
        }
    }
}

/// Score a single dish. Returns `None` for dishes without ingredients.
fn score<'a>(dish: &'a Dish, pantry: &Pantry) -> Option<Scored<'a>> {
    let total = dish.ingredients.len();
    if total == 0 {
        return None;
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let mut matched = 0;
    let mut missing = Vec::new();

    for ingredient in &dish.ingredients {
        let normalized = ingredient.to_lowercase();
        if !seen.insert(normalized.clone()) {
            continue;
        }
        if pantry.contains(&normalized) {
            matched += 1;
        } else {
            missing.push(normalized);
        }
    }

    Some(Scored {
        dish,
        matched,
        total,
        missing,
    })
}

/// Rank `dishes` against `pantry`, best match first.
pub fn match_dishes(dishes: &[Dish], pantry: &Pantry) -> Vec<MatchResult> {
    let mut scored: Vec<Scored<'_>> = dishes
        .iter()
        .filter_map(|d| score(d, pantry))
        .filter(|s| s.matched > 0)
        .collect();

    scored.sort_by(|a, b| {
        b.cmp_ratio(a)
            .then_with(|| a.dish.name.cmp(&b.dish.name))
    });
    scored.truncate(MAX_MATCHES);

    scored.into_iter().map(Scored::into_result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dish::NewDish;
    use chrono::Utc;

    fn dish(name: &str, ingredients: &[&str]) -> Dish {
        NewDish::new(name, ingredients).into_dish(Uuid::new_v4(), Utc::now())
    }

    fn pantry(items: &[&str]) -> Pantry {
        Pantry::new(items).unwrap()
    }

    #[test]
    fn test_worked_example() {
        let dishes = vec![dish("Plain rice", &["Rice", "Water", "Salt"])];
        let results = match_dishes(&dishes, &pantry(&["rice", "salt", "pepper"]));

        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.matched_ingredients_count, 2);
        assert_eq!(r.total_ingredients_count, 3);
        assert_eq!(r.match_percentage, 67);
        assert_eq!(r.missing_ingredients, vec!["water"]);
        assert_eq!(r.ingredients, vec!["Rice", "Water", "Salt"]);
    }

    #[test]
    fn test_pantry_is_trimmed_and_lowercased() {
        let p = pantry(&["  Rice ", "SALT", ""]);
        assert_eq!(p.len(), 2);
        assert!(p.contains("rice"));
        assert!(p.contains("salt"));
    }

    #[test]
    fn test_blank_pantry_is_invalid() {
        assert!(matches!(
            Pantry::new(&[" ", ""]),
            Err(MatchError::InvalidInput)
        ));
        assert!(matches!(
            Pantry::new::<&str>(&[]),
            Err(MatchError::InvalidInput)
        ));
    }

    #[test]
    fn test_dishes_without_overlap_are_dropped() {
        let dishes = vec![
            dish("Dal", &["Lentils", "Turmeric"]),
            dish("Kheer", &["Milk", "Rice", "Sugar"]),
        ];
        let results = match_dishes(&dishes, &pantry(&["rice"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Kheer");
    }

    #[test]
    fn test_empty_ingredient_list_never_matches() {
        let dishes = vec![dish("Mystery", &[]), dish("Kheer", &["Milk"])];
        let results = match_dishes(&dishes, &pantry(&["milk", "anything"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Kheer");
    }

    #[test]
    fn test_ties_are_broken_by_name() {
        let dishes = vec![
            dish("Upma", &["Semolina", "Onion"]),
            dish("Poha", &["Rice flakes", "Onion"]),
            dish("Bhindi", &["Okra", "Onion"]),
        ];
        let results = match_dishes(&dishes, &pantry(&["onion"]));
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bhindi", "Poha", "Upma"]);
        assert!(results.iter().all(|r| r.match_percentage == 50));
    }

    #[test]
    fn test_ranking_uses_unrounded_ratio() {
        // 2/3 = 66.67% and 67/100 = 67% both round to 67, but the second is
        // the better match and must come first despite its later name.
        let hundred: Vec<String> = (0..100).map(|i| format!("item{i}")).collect();
        let hundred_refs: Vec<&str> = hundred.iter().map(String::as_str).collect();
        let dishes = vec![
            dish("Alpha", &["a", "b", "c"]),
            dish("Zeta", &hundred_refs),
        ];

        let mut pantry_items: Vec<&str> = vec!["a", "b"];
        pantry_items.extend(hundred_refs.iter().take(67));
        let results = match_dishes(&dishes, &pantry(&pantry_items));

        assert_eq!(results[0].name, "Zeta");
        assert_eq!(results[1].name, "Alpha");
        assert_eq!(results[0].match_percentage, 67);
        assert_eq!(results[1].match_percentage, 67);
    }

    #[test]
    fn test_results_are_capped() {
        let dishes: Vec<Dish> = (0..25)
            .map(|i| dish(&format!("Dish {i:02}"), &["Onion", "Garlic"]))
            .collect();
        let results = match_dishes(&dishes, &pantry(&["onion"]));
        assert_eq!(results.len(), MAX_MATCHES);
        assert_eq!(results[0].name, "Dish 00");
    }

    #[test]
    fn test_missing_never_contains_pantry_items() {
        let dishes = vec![
            dish("Chole", &["Chickpeas", "Onion", "TOMATO", "Garam masala"]),
            dish("Rajma", &["Kidney beans", "Onion", "Tomato"]),
        ];
        let p = pantry(&["Tomato", "onion"]);
        for r in match_dishes(&dishes, &p) {
            assert!(r.matched_ingredients_count >= 1);
            assert!(r.missing_ingredients.iter().all(|m| !p.contains(m)));
        }
    }

    #[test]
    fn test_duplicate_dish_ingredients_count_once() {
        let dishes = vec![dish("Odd", &["Salt", "salt", "Water"])];
        let results = match_dishes(&dishes, &pantry(&["salt"]));
        let r = &results[0];
        assert_eq!(r.matched_ingredients_count, 1);
        assert_eq!(r.total_ingredients_count, 3);
        assert_eq!(r.match_percentage, 33);
        assert_eq!(r.missing_ingredients, vec!["water"]);
    }

    #[test]
    fn test_serialized_field_names() {
        let dishes = vec![dish("Plain rice", &["Rice", "Water"])];
        let results = match_dishes(&dishes, &pantry(&["rice"]));
        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["matchPercentage"], 50);
        assert_eq!(json["matchedIngredientsCount"], 1);
        assert_eq!(json["totalIngredientsCount"], 2);
        assert_eq!(json["missingIngredients"][0], "water");
        assert!(json.get("prep_time").is_some());
    }
}
