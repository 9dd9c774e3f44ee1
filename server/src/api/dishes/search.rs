use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use thali_core::{service, Dish};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free text matched against name, ingredients, region and state
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Dish>,
}

#[utoipa::path(
    get,
    path = "/api/v1/dishes/search",
    tag = "dishes",
    params(SearchParams),
    responses(
        (status = 200, description = "Up to 10 matching dishes", body = SearchResponse),
        (status = 400, description = "Missing search query", body = ErrorResponse),
        (status = 500, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn search_dishes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::validation("Search query is required"))?;

    let data = service::search_dishes(state.catalog.as_ref(), query)?;

    Ok(Json(SearchResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::dishes::test_support::{get, sample_catalog, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_search_finds_by_ingredient_word() {
        let (status, json) = get(test_app(sample_catalog()), "/api/v1/dishes/search?q=rice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 2);
    }

    #[tokio::test]
    async fn test_search_query_is_trimmed() {
        let (status, json) =
            get(test_app(sample_catalog()), "/api/v1/dishes/search?q=%20%20punjab%20").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["name"], "Chicken tikka");
    }

    #[tokio::test]
    async fn test_blank_query_is_bad_request() {
        for uri in ["/api/v1/dishes/search", "/api/v1/dishes/search?q=%20"] {
            let (status, json) = get(test_app(sample_catalog()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["message"], "Search query is required");
        }
    }
}
