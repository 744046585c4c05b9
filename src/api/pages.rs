use axum::response::Html;
use axum::{routing::get, Router};

use crate::state::AppState;
use crate::templates::{INDEX_PAGE, STATUS_PAGE};

/// Static HTML pages
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/status", get(status_page))
}

/// GET / - Index page listing available endpoints
async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// GET /status - Email status viewer
async fn status_page() -> Html<&'static str> {
    Html(STATUS_PAGE)
}
