use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thali_core::catalog::DEFAULT_PAGE_SIZE;
use thali_core::{service, Course, Diet, Dish, DishFilter, DishQuery, FlavorProfile};
use utoipa::{IntoParams, ToSchema};

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

const ARRAY_FORMAT_MESSAGE: &str = "Invalid filter format. Arrays should be JSON strings.";

/// Raw query string. Everything arrives as text and is validated in
/// [`ListDishesParams::into_query`] so bad values get a JSON 400.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDishesParams {
    /// 1-based page number (default: 1)
    pub page: Option<String>,
    /// Page size between 1 and 100 (default: 10)
    pub limit: Option<String>,
    /// Any stored field, e.g. `name`, `ingredients`, `prep_time`, `id` (default: name)
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default: asc)
    pub order: Option<String>,
    /// `vegetarian` or `non-vegetarian`
    pub diet: Option<String>,
    /// JSON array of courses, e.g. `["dessert","snack"]`
    pub course: Option<String>,
    /// JSON array of flavor profiles, e.g. `["sweet"]`
    pub flavor_profile: Option<String>,
}

/// Treat missing and blank parameters alike.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_positive(name: &str, value: Option<&str>, default: u32) -> Result<u32, ApiError> {
    match present(value) {
        None => Ok(default),
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ApiError::validation(format!(
                "{name} must be a positive integer"
            ))),
        },
    }
}

fn parse_value<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = thali_core::ParseEnumError>,
{
    present(value)
        .map(|raw| raw.parse::<T>().map_err(|e| ApiError::validation(e.to_string())))
        .transpose()
}

/// Decode a JSON array parameter such as `["dessert","snack"]`.
fn parse_json_array<T>(value: Option<&str>) -> Result<Vec<T>, ApiError>
where
    T: FromStr<Err = thali_core::ParseEnumError>,
{
    let Some(raw) = present(value) else {
        return Ok(Vec::new());
    };

    let items: Vec<String> =
        serde_json::from_str(raw).map_err(|_| ApiError::validation(ARRAY_FORMAT_MESSAGE))?;

    items
        .iter()
        .map(|item| item.parse::<T>().map_err(|e| ApiError::validation(e.to_string())))
        .collect()
}

impl ListDishesParams {
    pub fn into_query(self) -> Result<DishQuery, ApiError> {
        let page = parse_positive("page", self.page.as_deref(), 1)?;
        let limit = parse_positive("limit", self.limit.as_deref(), DEFAULT_PAGE_SIZE)?;
        if limit > MAX_PAGE_SIZE {
            return Err(ApiError::validation(format!(
                "limit must not exceed {MAX_PAGE_SIZE}"
            )));
        }

        Ok(DishQuery {
            filter: DishFilter {
                diet: parse_value::<Diet>(self.diet.as_deref())?,
                courses: parse_json_array::<Course>(self.course.as_deref())?,
                flavor_profiles: parse_json_array::<FlavorProfile>(
                    self.flavor_profile.as_deref(),
                )?,
            },
            sort_by: parse_value(self.sort_by.as_deref())?.unwrap_or_default(),
            order: parse_value(self.order.as_deref())?.unwrap_or_default(),
            page,
            limit,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListDishesResponse {
    pub success: bool,
    /// Dishes on this page
    pub count: usize,
    /// Dishes matching the filter across all pages
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub data: Vec<Dish>,
}

#[utoipa::path(
    get,
    path = "/api/v1/dishes",
    tag = "dishes",
    params(ListDishesParams),
    responses(
        (status = 200, description = "One page of dishes", body = ListDishesResponse),
        (status = 400, description = "Malformed query parameter", body = ErrorResponse),
        (status = 500, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn list_dishes(
    State(state): State<AppState>,
    Query(params): Query<ListDishesParams>,
) -> Result<Json<ListDishesResponse>, ApiError> {
    let query = params.into_query()?;
    let listing = service::list_dishes(state.catalog.as_ref(), &query)?;

    Ok(Json(ListDishesResponse {
        success: true,
        count: listing.items.len(),
        total: listing.total,
        total_pages: listing.total_pages,
        current_page: listing.current_page,
        data: listing.items,
    }))
}
