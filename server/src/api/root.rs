use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

pub const API_VERSION: &str = "v1";

#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
    pub environment: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "root",
    responses(
        (status = 200, description = "Service banner", body = WelcomeResponse)
    )
)]
pub async fn welcome(State(state): State<AppState>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Indian Food API".to_string(),
        version: API_VERSION.to_string(),
        environment: state.config.environment.clone(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(welcome))
}

#[derive(OpenApi)]
#[openapi(paths(welcome), components(schemas(WelcomeResponse)))]
pub struct ApiDoc;
