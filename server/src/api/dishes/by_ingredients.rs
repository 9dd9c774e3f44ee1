use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use thali_core::{service, MatchResult};
use utoipa::ToSchema;

const EMPTY_REQUEST_MESSAGE: &str = "Please provide a non-empty array of ingredients";

#[derive(Debug, Deserialize, ToSchema)]
pub struct ByIngredientsRequest {
    /// Ingredients on hand; compared case-insensitively
    pub ingredients: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ByIngredientsResponse {
    pub success: bool,
    pub count: usize,
    /// Best match first, at most 10
    pub data: Vec<MatchResult>,
}

#[utoipa::path(
    post,
    path = "/api/v1/dishes/by-ingredients",
    tag = "dishes",
    request_body = ByIngredientsRequest,
    responses(
        (status = 200, description = "Dishes ranked by pantry coverage", body = ByIngredientsResponse),
        (status = 400, description = "No usable ingredients", body = ErrorResponse),
        (status = 500, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn find_by_ingredients(
    State(state): State<AppState>,
    payload: Result<Json<ByIngredientsRequest>, JsonRejection>,
) -> Result<Json<ByIngredientsResponse>, ApiError> {
    let ingredients = match payload {
        Ok(Json(ByIngredientsRequest {
            ingredients: Some(ingredients),
        })) if !ingredients.is_empty() => ingredients,
        Ok(_) => return Err(ApiError::validation(EMPTY_REQUEST_MESSAGE)),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected by-ingredients body");
            return Err(ApiError::validation(EMPTY_REQUEST_MESSAGE));
        }
    };

    let data = service::find_dishes_by_ingredients(state.catalog.as_ref(), &ingredients)?;

    Ok(Json(ByIngredientsResponse {
        success: true,
        count: data.len(),
        data,
    }))
}
