use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use thali_core::service;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct IngredientsResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/dishes/ingredients",
    tag = "dishes",
    responses(
        (status = 200, description = "Every ingredient in the catalog, sorted", body = IngredientsResponse),
        (status = 500, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> Result<Json<IngredientsResponse>, ApiError> {
    let data = service::all_ingredients(state.catalog.as_ref())?;
    Ok(Json(IngredientsResponse {
        success: true,
        count: data.len(),
        data,
    }))
}
