pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::cover_letter::handlers as cover_letter;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Request bodies above this size are rejected with 413.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Resumes
        .route(
            "/api/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        // Applications
        .route(
            "/api/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/applications/:id",
            get(applications::handle_get_application)
                .put(applications::handle_update_application)
                .delete(applications::handle_delete_application),
        )
        // Cover letters
        .route(
            "/api/generate-cover-letter",
            post(cover_letter::handle_generate_cover_letter),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
