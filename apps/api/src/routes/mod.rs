pub mod health;
pub mod session;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::matrix::handlers as matrix;
use crate::proposals::handlers as proposals;
use crate::roster::handlers as roster;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route("/api/v1/session", get(session::handle_session_summary))
        .route(
            "/api/v1/session/credential",
            put(session::handle_set_credential),
        )
        // Roster
        .route(
            "/api/v1/lcats",
            get(roster::handle_get_lcats).post(roster::handle_upload_lcats),
        )
        .route(
            "/api/v1/candidates",
            get(roster::handle_list_candidates).post(roster::handle_upload_resumes),
        )
        .route(
            "/api/v1/candidates/export",
            get(roster::handle_export_roster),
        )
        .route(
            "/api/v1/candidates/:id",
            delete(roster::handle_delete_candidate),
        )
        // Proposals
        .route(
            "/api/v1/proposals",
            get(proposals::handle_list_proposals).post(proposals::handle_upload_proposals),
        )
        .route(
            "/api/v1/proposals/text",
            post(proposals::handle_paste_proposal),
        )
        .route(
            "/api/v1/proposals/export",
            get(proposals::handle_export_requirements),
        )
        .route(
            "/api/v1/proposals/:id",
            delete(proposals::handle_delete_proposal),
        )
        // Staffing matrix
        .route("/api/v1/matrix", get(matrix::handle_get_matrix))
        .route("/api/v1/matrix/optimize", post(matrix::handle_optimize))
        .route("/api/v1/matrix/export", get(matrix::handle_export_staffing))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
