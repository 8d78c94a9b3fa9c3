pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extraction;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod recognition;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Schedule Intake API",
        version = "1.0.0",
        description = "Upload a photo of a class schedule, verify the extracted text and save it"
    ),
    tags(
        (name = "Pages", description = "HTML pages"),
        (name = "Intake", description = "Schedule image upload and extraction"),
        (name = "Schedules", description = "Confirmed schedules"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::app_routes(state.config.storage.max_image_size))
        .split_for_parts();

    let cors = cors_layer(&state.config.server.cors);

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .max_age(Duration::from_secs(config.max_age))
}
