pub mod emails;
pub mod health;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(pages::page_routes())
        .merge(health::health_routes())
        .merge(emails::email_routes())
        .with_state(state)
}
