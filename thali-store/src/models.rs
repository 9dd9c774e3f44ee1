use chrono::{DateTime, Utc};
use diesel::prelude::*;
use thali_core::{CatalogError, Dish, NewDish};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::dishes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DishRow {
    pub id: Uuid,
    pub name: String,
    pub ingredients: Vec<Option<String>>,
    pub diet: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub flavor_profile: Option<String>,
    pub course: String,
    pub state: Option<String>,
    pub region: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn minutes(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

impl TryFrom<DishRow> for Dish {
    type Error = CatalogError;

    fn try_from(row: DishRow) -> Result<Self, Self::Error> {
        let corrupt = |e: thali_core::ParseEnumError| {
            CatalogError::Corrupt(format!("dish {}: {}", row.id, e))
        };

        let diet = row.diet.parse().map_err(corrupt)?;
        let course = row.course.parse().map_err(corrupt)?;
        let flavor_profile = row
            .flavor_profile
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(corrupt)?;
        let region = row
            .region
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(corrupt)?;

        Ok(Dish {
            id: row.id,
            name: row.name,
            ingredients: row.ingredients.into_iter().flatten().collect(),
            diet,
            prep_time: minutes(row.prep_time),
            cook_time: minutes(row.cook_time),
            flavor_profile,
            course,
            state: row.state,
            region,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::dishes)]
pub struct NewDishRow<'a> {
    pub name: &'a str,
    pub ingredients: Vec<Option<String>>,
    pub diet: &'static str,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub flavor_profile: Option<&'static str>,
    pub course: &'static str,
    pub state: Option<&'a str>,
    pub region: Option<&'static str>,
}

impl<'a> From<&'a NewDish> for NewDishRow<'a> {
    fn from(dish: &'a NewDish) -> Self {
        Self {
            name: &dish.name,
            ingredients: dish.ingredients.iter().cloned().map(Some).collect(),
            diet: dish.diet.as_str(),
            prep_time: dish.prep_time.and_then(|v| i32::try_from(v).ok()),
            cook_time: dish.cook_time.and_then(|v| i32::try_from(v).ok()),
            flavor_profile: dish.flavor_profile.map(|f| f.as_str()),
            course: dish.course.as_str(),
            state: dish.state.as_deref(),
            region: dish.region.map(|r| r.as_str()),
        }
    }
}
