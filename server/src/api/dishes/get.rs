use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use thali_core::Dish;
use uuid::Uuid;

const NOT_FOUND_MESSAGE: &str = "Dish not found";

#[utoipa::path(
    get,
    path = "/api/v1/dishes/{id}",
    tag = "dishes",
    params(
        ("id" = Uuid, Path, description = "Dish ID")
    ),
    responses(
        (status = 200, description = "Dish details", body = Dish),
        (status = 404, description = "Dish not found", body = ErrorResponse),
        (status = 500, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Dish>, ApiError> {
    // A malformed id cannot name a stored dish
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    state
        .catalog
        .get(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dishes::test_support::{get, sample_catalog, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_get_existing_dish() {
        let catalog = sample_catalog();
        let kheer = catalog
            .dishes()
            .iter()
            .find(|d| d.name == "Kheer")
            .unwrap()
            .clone();

        let (status, json) = get(test_app(catalog), &format!("/api/v1/dishes/{}", kheer.id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], kheer.id.to_string());
        assert_eq!(json["name"], "Kheer");
        assert_eq!(json["course"], "dessert");
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
            let (status, json) =
                get(test_app(sample_catalog()), &format!("/api/v1/dishes/{id}")).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(json["message"], NOT_FOUND_MESSAGE);
        }
    }
}
