use crate::db::DbPool;
use crate::models::{DishRow, NewDishRow};
use crate::raw_sql::{
    contains_pattern, ingredient_ilike, text_search_matches, text_search_rank_desc,
    DISTINCT_INGREDIENTS_QUERY,
};
use crate::schema::dishes;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use thali_core::{
    CatalogError, Course, Dish, DishCatalog, DishFilter, DishPage, DishQuery, FlavorProfile,
    NewDish, SortField, SortOrder,
};
use uuid::Uuid;

/// Rows per INSERT statement when bulk loading.
const INSERT_BATCH: usize = 500;

#[derive(QueryableByName)]
struct IngredientRow {
    #[diesel(sql_type = Nullable<Text>)]
    ingredient: Option<String>,
}

/// Sort `$query` by `$column`: nulls first ascending, last descending, then
/// by id so pages are stable.
macro_rules! order_by {
    ($query:expr, $column:expr, $order:expr) => {
        match $order {
            SortOrder::Asc => $query.order(($column.asc().nulls_first(), dishes::id.asc())),
            SortOrder::Desc => $query.order(($column.desc().nulls_last(), dishes::id.asc())),
        }
    };
}

fn filtered(filter: &DishFilter) -> dishes::BoxedQuery<'static, Pg> {
    let mut query = dishes::table.into_boxed();

    if let Some(diet) = filter.diet {
        query = query.filter(dishes::diet.eq(diet.as_str()));
    }
    if !filter.courses.is_empty() {
        let courses: Vec<&'static str> = filter.courses.iter().map(|c| c.as_str()).collect();
        query = query.filter(dishes::course.eq_any(courses));
    }
    if !filter.flavor_profiles.is_empty() {
        let flavors: Vec<&'static str> =
            filter.flavor_profiles.iter().map(|f| f.as_str()).collect();
        query = query.filter(dishes::flavor_profile.eq_any(flavors));
    }

    query
}

fn into_dishes(rows: Vec<DishRow>) -> Result<Vec<Dish>, CatalogError> {
    rows.into_iter().map(Dish::try_from).collect()
}

fn clamp_i64(value: impl TryInto<i64>) -> i64 {
    value.try_into().unwrap_or(i64::MAX)
}

/// Dish catalog backed by the `dishes` table.
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Check out a connection and run `f` inside a `db.query` span.
    fn run<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut PgConnection) -> QueryResult<T>,
    ) -> Result<T, CatalogError> {
        let _span = tracing::debug_span!("db.query", operation).entered();
        let mut conn = self
            .pool
            .get()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        f(&mut conn).map_err(|e| CatalogError::query(operation, e))
    }

    /// Replace the whole catalog with `new_dishes` in one transaction.
    ///
    /// Returns the number of rows inserted.
    pub fn replace_all(&self, new_dishes: &[NewDish]) -> Result<usize, CatalogError> {
        let rows: Vec<NewDishRow<'_>> = new_dishes.iter().map(NewDishRow::from).collect();

        let inserted = self.run("replace_all", |conn| {
            conn.transaction(|conn| {
                let deleted = diesel::delete(dishes::table).execute(conn)?;
                tracing::info!(deleted, "cleared existing dishes");

                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_BATCH) {
                    inserted += diesel::insert_into(dishes::table)
                        .values(chunk)
                        .execute(conn)?;
                }
                Ok(inserted)
            })
        })?;

        tracing::info!(inserted, "loaded dishes");
        Ok(inserted)
    }
}

impl DishCatalog for PgCatalog {
    fn list(&self, query: &DishQuery) -> Result<DishPage, CatalogError> {
        let (rows, total) = self.run("list", |conn| {
            let total: i64 = filtered(&query.filter).count().get_result(conn)?;

            let base = filtered(&query.filter);
            let sorted = match query.sort_by {
                SortField::Id => order_by!(base, dishes::id, query.order),
                SortField::Name => order_by!(base, dishes::name, query.order),
                SortField::Ingredients => order_by!(base, dishes::ingredients, query.order),
                SortField::Diet => order_by!(base, dishes::diet, query.order),
                SortField::PrepTime => order_by!(base, dishes::prep_time, query.order),
                SortField::CookTime => order_by!(base, dishes::cook_time, query.order),
                SortField::FlavorProfile => order_by!(base, dishes::flavor_profile, query.order),
                SortField::Course => order_by!(base, dishes::course, query.order),
                SortField::State => order_by!(base, dishes::state, query.order),
                SortField::Region => order_by!(base, dishes::region, query.order),
                SortField::CreatedAt => order_by!(base, dishes::created_at, query.order),
                SortField::UpdatedAt => order_by!(base, dishes::updated_at, query.order),
            };

            let rows = sorted
                .offset(clamp_i64(query.offset()))
                .limit(i64::from(query.limit))
                .select(DishRow::as_select())
                .load::<DishRow>(conn)?;

            Ok((rows, total))
        })?;

        Ok(DishPage {
            items: into_dishes(rows)?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    fn get(&self, id: Uuid) -> Result<Option<Dish>, CatalogError> {
        let row = self.run("get", |conn| {
            dishes::table
                .find(id)
                .select(DishRow::as_select())
                .first::<DishRow>(conn)
                .optional()
        })?;

        row.map(Dish::try_from).transpose()
    }

    fn text_search(&self, query: &str, limit: usize) -> Result<Vec<Dish>, CatalogError> {
        let rows = self.run("text_search", |conn| {
            dishes::table
                .filter(text_search_matches!(query))
                .order(text_search_rank_desc!(query))
                .then_order_by(dishes::name.asc())
                .limit(clamp_i64(limit))
                .select(DishRow::as_select())
                .load::<DishRow>(conn)
        })?;

        into_dishes(rows)
    }

    fn ingredient_search(
        &self,
        needle: &str,
        exclude: &[Uuid],
        limit: usize,
    ) -> Result<Vec<Dish>, CatalogError> {
        let pattern = contains_pattern(needle);
        let rows = self.run("ingredient_search", |conn| {
            let mut query = dishes::table
                .filter(ingredient_ilike!(pattern.as_str()))
                .into_boxed();
            if !exclude.is_empty() {
                query = query.filter(dishes::id.ne_all(exclude.to_vec()));
            }

            query
                .order((dishes::name.asc(), dishes::id.asc()))
                .limit(clamp_i64(limit))
                .select(DishRow::as_select())
                .load::<DishRow>(conn)
        })?;

        into_dishes(rows)
    }

    fn all_dishes(&self) -> Result<Vec<Dish>, CatalogError> {
        let rows = self.run("all_dishes", |conn| {
            dishes::table
                .order(dishes::id.asc())
                .select(DishRow::as_select())
                .load::<DishRow>(conn)
        })?;

        into_dishes(rows)
    }

    fn distinct_ingredients(&self) -> Result<Vec<String>, CatalogError> {
        let rows = self.run("distinct_ingredients", |conn| {
            diesel::sql_query(DISTINCT_INGREDIENTS_QUERY).load::<IngredientRow>(conn)
        })?;

        Ok(rows.into_iter().filter_map(|r| r.ingredient).collect())
    }

    fn distinct_courses(&self) -> Result<Vec<Course>, CatalogError> {
        let values = self.run("distinct_courses", |conn| {
            dishes::table
                .select(dishes::course)
                .distinct()
                .order(dishes::course.asc())
                .load::<String>(conn)
        })?;

        values
            .iter()
            .map(|v| v.parse().map_err(|e| CatalogError::Corrupt(format!("{e}"))))
            .collect()
    }

    fn distinct_flavor_profiles(&self) -> Result<Vec<FlavorProfile>, CatalogError> {
        let values = self.run("distinct_flavor_profiles", |conn| {
            dishes::table
                .select(dishes::flavor_profile)
                .filter(dishes::flavor_profile.is_not_null())
                .distinct()
                .order(dishes::flavor_profile.asc())
                .load::<Option<String>>(conn)
        })?;

        values
            .iter()
            .flatten()
            .map(|v| v.parse().map_err(|e| CatalogError::Corrupt(format!("{e}"))))
            .collect()
    }
}
