//! CSV import transform.
//!
//! Reads the dataset layout `name, ingredients, diet, prep_time, cook_time,
//! flavor_profile, course, state, region` and cleans each row into a
//! [`NewDish`]. Unknown enum values fall back to a default (course, diet) or
//! are dropped (flavor, region); `-1` and blanks mean "unknown".

use crate::dish::{Course, Diet, FlavorProfile, NewDish, Region};
use crate::error::ImportError;
use serde::Deserialize;
use std::io::Read;

/// One raw CSV row. Every column is optional so a sparse row still parses.
#[derive(Debug, Default, Deserialize)]
pub struct CsvDish {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub flavor_profile: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn clean_text(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() || value == "-1" {
        return None;
    }
    Some(capitalize(value))
}

/// Minutes from the leading digits, so `"45 min"` and `"12.5"` still count.
/// Negative or digit-less values are unknown.
fn parse_minutes(value: Option<&str>) -> Option<u32> {
    let value = value?.trim();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse::<u32>().ok()
}

fn split_ingredients(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(capitalize)
        .collect()
}

pub fn transform(row: &CsvDish) -> NewDish {
    let diet = match row.diet.as_deref().map(str::trim) {
        Some(d) if d.eq_ignore_ascii_case("vegetarian") => Diet::Vegetarian,
        _ => Diet::NonVegetarian,
    };

    NewDish {
        name: clean_text(row.name.as_deref()).unwrap_or_default(),
        ingredients: split_ingredients(row.ingredients.as_deref()),
        diet,
        prep_time: parse_minutes(row.prep_time.as_deref()),
        cook_time: parse_minutes(row.cook_time.as_deref()),
        flavor_profile: row.flavor_profile.as_deref().and_then(FlavorProfile::parse_loose),
        course: row
            .course
            .as_deref()
            .and_then(Course::parse_loose)
            .unwrap_or(Course::MainCourse),
        state: clean_text(row.state.as_deref()),
        region: row.region.as_deref().and_then(Region::parse_loose),
    }
}

/// Parse and transform a whole CSV document.
///
/// Rows without a name are skipped; the first malformed record aborts the
/// import.
pub fn read_dishes<R: Read>(reader: R) -> Result<Vec<NewDish>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut dishes = Vec::new();
    for record in csv_reader.deserialize::<CsvDish>() {
        let row = record.map_err(|source| ImportError::Csv {
            line: source.position().map(|p| p.line()).unwrap_or(0),
            source,
        })?;

        let dish = transform(&row);
        if dish.name.is_empty() {
            tracing::warn!(?row, "skipping CSV row without a name");
            continue;
        }
        dishes.push(dish);
    }

    tracing::info!(count = dishes.len(), "parsed dishes from CSV");
    Ok(dishes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
name,ingredients,diet,prep_time,cook_time,flavor_profile,course,state,region
Balu shahi,\"Maida flour, yogurt, oil, sugar\",vegetarian,45,25,sweet,dessert,West Bengal,East
Chicken razala,\"Chicken, dahi, sesame seeds\",non vegetarian,10,60,spicy,main course,-1,-1
Pani puri,\"Kala chana, mashed potato,  , boondi\",Vegetarian,-1,,sour,snack,Maharashtra,west
";

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("mAIDA FLOUR"), "Maida flour");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_read_sample() {
        let dishes = read_dishes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dishes.len(), 3);

        let balu = &dishes[0];
        assert_eq!(balu.name, "Balu shahi");
        assert_eq!(
            balu.ingredients,
            vec!["Maida flour", "Yogurt", "Oil", "Sugar"]
        );
        assert_eq!(balu.diet, Diet::Vegetarian);
        assert_eq!(balu.prep_time, Some(45));
        assert_eq!(balu.flavor_profile, Some(FlavorProfile::Sweet));
        assert_eq!(balu.course, Course::Dessert);
        assert_eq!(balu.state.as_deref(), Some("West bengal"));
        assert_eq!(balu.region, Some(Region::East));

        let razala = &dishes[1];
        assert_eq!(razala.diet, Diet::NonVegetarian);
        assert_eq!(razala.state, None);
        assert_eq!(razala.region, None);

        let puri = &dishes[2];
        assert_eq!(puri.ingredients, vec!["Kala chana", "Mashed potato", "Boondi"]);
        assert_eq!(puri.prep_time, None);
        assert_eq!(puri.cook_time, None);
        assert_eq!(puri.region, Some(Region::West));
    }

    #[test]
    fn test_unknown_course_defaults_to_main() {
        let row = CsvDish {
            name: Some("Thing".into()),
            course: Some("brunch".into()),
            flavor_profile: Some("umami".into()),
            ..Default::default()
        };
        let dish = transform(&row);
        assert_eq!(dish.course, Course::MainCourse);
        assert_eq!(dish.flavor_profile, None);
        assert!(dish.ingredients.is_empty());
    }

    #[test]
    fn test_negative_times_are_unknown() {
        assert_eq!(parse_minutes(Some("-5")), None);
        assert_eq!(parse_minutes(Some(" 30 ")), Some(30));
        assert_eq!(parse_minutes(Some("soon")), None);
        assert_eq!(parse_minutes(Some("")), None);
    }

    #[test]
    fn test_minutes_use_leading_digits() {
        assert_eq!(parse_minutes(Some("45 min")), Some(45));
        assert_eq!(parse_minutes(Some("12.5")), Some(12));
        assert_eq!(parse_minutes(Some("+20")), Some(20));
    }
}
