pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::jobs::handlers;
use crate::recommend::handlers::handle_recommend_category;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/", get(handlers::handle_home))
        .route("/search", get(handlers::handle_search))
        .route("/job/:id", get(handlers::handle_job_detail))
        .route(
            "/create",
            get(handlers::handle_create_form).post(handlers::handle_create),
        )
        // Recommendation
        .route("/recommend_category", post(handle_recommend_category))
        .nest_service("/static", static_files)
        .with_state(state)
}
