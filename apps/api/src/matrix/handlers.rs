use axum::{extract::State, response::Response, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::export::matrices::staffing_csv;
use crate::export::{csv_attachment, STAFFING_PREFIX};
use crate::matrix::optimizer::{optimization_inputs, optimize_staffing};
use crate::matrix::reconciler::{build_matrix_view, MatrixView};
use crate::session::Session;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    /// Size of the assignment set that was thrown away.
    pub discarded: usize,
    pub installed: usize,
    pub matrix: MatrixView,
}

fn view_of(session: &Session) -> MatrixView {
    build_matrix_view(
        session.candidates(),
        session.proposals(),
        session.assignments(),
        session.allowed_lcats(),
    )
}

/// POST /api/v1/matrix/optimize
/// Replaces the whole assignment set on success; on failure the previous set is kept.
/// Inputs are read only once the gateway lane is held, so ingestion that was queued
/// ahead of this run is part of it.
pub async fn handle_optimize(
    State(state): State<AppState>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let _lane = state.enter_gateway_lane().await?;
    let (credential, (candidates, proposals)) = {
        let session = state.session.read().await;
        (session.credential()?, optimization_inputs(&session)?)
    };

    let assignments =
        optimize_staffing(state.gateway.as_ref(), &credential, &candidates, &proposals)
            .await
            .map_err(|e| AppError::extraction("Staffing optimization", e))?;

    let mut session = state.session.write().await;
    let installed = assignments.len();
    let discarded = session.replace_assignments(assignments);
    Ok(Json(OptimizeResponse {
        discarded,
        installed,
        matrix: view_of(&session),
    }))
}

/// GET /api/v1/matrix
pub async fn handle_get_matrix(State(state): State<AppState>) -> Json<MatrixView> {
    Json(view_of(&*state.session.read().await))
}

/// GET /api/v1/matrix/export
pub async fn handle_export_staffing(State(state): State<AppState>) -> Response {
    let session = state.session.read().await;
    let body = staffing_csv(
        session.candidates(),
        session.proposals(),
        session.assignments(),
    );
    csv_attachment(STAFFING_PREFIX, body)
}
