pub mod by_ingredients;
pub mod filter_options;
pub mod get;
pub mod ingredients;
pub mod list;
pub mod search;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for dish endpoints (mounted at `{prefix}/dishes`)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_dishes))
        .route("/search", get(search::search_dishes))
        .route("/filter-options", get(filter_options::get_filter_options))
        .route("/by-ingredients", post(by_ingredients::find_by_ingredients))
        .route("/ingredients", get(ingredients::list_ingredients))
        .route("/{id}", get(get::get_dish))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_dishes,
        search::search_dishes,
        filter_options::get_filter_options,
        by_ingredients::find_by_ingredients,
        ingredients::list_ingredients,
        get::get_dish,
    ),
    components(schemas(
        thali_core::Dish,
        thali_core::Diet,
        thali_core::Course,
        thali_core::FlavorProfile,
        thali_core::Region,
        thali_core::MatchResult,
        thali_core::FilterOptions,
        list::ListDishesResponse,
        search::SearchResponse,
        filter_options::FilterOptionsResponse,
        by_ingredients::ByIngredientsRequest,
        by_ingredients::ByIngredientsResponse,
        ingredients::IngredientsResponse,
    ))
)]
pub struct ApiDoc;
