use axum::response::Html;

const INDEX_PAGE: &str = include_str!("../../assets/index.html");

/// Landing page with the schedule upload form.
#[utoipa::path(
    get,
    path = "/",
    tag = "Pages",
    operation_id = "index",
    responses((status = 200, description = "Upload form", content_type = "text/html")),
)]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
