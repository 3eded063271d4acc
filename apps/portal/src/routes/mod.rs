pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::cvs::handlers as cvs;
use crate::ranking::handlers as ranking;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route("/api/v1/auth/login", post(session::handle_login))
        .route("/api/v1/auth/register", post(session::handle_register))
        .route("/api/v1/auth/logout", post(session::handle_logout))
        .route("/api/v1/dashboard", get(session::handle_dashboard))
        // Recruiter ranking workspace
        .route("/api/v1/ranking", post(ranking::handle_rank))
        .route("/api/v1/ranking/results", get(ranking::handle_results))
        .route("/api/v1/ranking/analytics", get(ranking::handle_analytics))
        .route("/api/v1/ranking/export.csv", get(ranking::handle_export_csv))
        .route("/api/v1/ranking/export.pdf", get(ranking::handle_export_pdf))
        .route(
            "/api/v1/ranking/export/save",
            post(ranking::handle_export_save),
        )
        .route("/api/v1/ranking/share", get(ranking::handle_share))
        .route("/api/v1/ranking/presets", get(ranking::handle_presets))
        .route("/api/v1/ranking/presets/:name", get(ranking::handle_preset))
        .route("/api/v1/suggestions", get(ranking::handle_suggestions))
        // Candidate profiles and CVs
        .route("/api/v1/candidates/:id", get(cvs::handle_get_profile))
        .route("/api/v1/cvs/count", get(ranking::handle_cv_count))
        .route("/api/v1/cvs/upload", post(cvs::handle_upload))
        .route("/api/v1/cvs/:id/primary", patch(cvs::handle_set_primary))
        .route("/api/v1/cvs/:id/download", get(cvs::handle_download))
        .with_state(state)
}
