use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn app_routes(max_image_size: u64) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::index::index))
        .routes(routes!(handlers::schedule::confirm))
        .routes(routes!(handlers::schedule::list_schedules))
        .routes(routes!(handlers::schedule::get_schedule))
        .merge(intake_routes(max_image_size))
}

fn intake_routes(max_image_size: u64) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::intake::verify))
        .routes(routes!(handlers::intake::upload))
        .layer(handlers::intake::intake_body_limit(max_image_size))
}
