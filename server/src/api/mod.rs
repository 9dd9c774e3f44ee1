pub mod dishes;
pub mod root;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thali_core::{CatalogError, MatchError};
use thiserror::Error;
use utoipa::{OpenApi, ToSchema};

/// Shared error body used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected before touching the catalog
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] CatalogError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::InvalidInput => Self::validation("Please provide valid ingredients"),
            MatchError::StoreUnavailable(e) => Self::Store(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side details stay in the logs
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Response for requests that matched no route.
pub async fn fallback() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Thali", description = "Indian dish catalog and ingredient matcher"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> =
        vec![root::ApiDoc::openapi(), dishes::ApiDoc::openapi()];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_errors_map_to_status() {
        assert_eq!(
            ApiError::from(MatchError::InvalidInput).status(),
            StatusCode::BAD_REQUEST
        );
        let down = MatchError::StoreUnavailable(CatalogError::Unavailable("refused".into()));
        assert_eq!(
            ApiError::from(down).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_openapi_lists_dish_routes() {
        let spec = openapi();
        for path in [
            "/",
            "/api/v1/dishes",
            "/api/v1/dishes/search",
            "/api/v1/dishes/filter-options",
            "/api/v1/dishes/by-ingredients",
            "/api/v1/dishes/ingredients",
            "/api/v1/dishes/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
