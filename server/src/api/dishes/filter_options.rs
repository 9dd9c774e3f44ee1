use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use thali_core::{service, FilterOptions};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct FilterOptionsResponse {
    pub success: bool,
    pub data: FilterOptions,
}

#[utoipa::path(
    get,
    path = "/api/v1/dishes/filter-options",
    tag = "dishes",
    responses(
        (status = 200, description = "Values usable as listing filters", body = FilterOptionsResponse),
        (status = 500, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn get_filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptionsResponse>, ApiError> {
    let data = service::filter_options(state.catalog.as_ref())?;
    Ok(Json(FilterOptionsResponse {
        success: true,
        data,
    }))
}
