use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::matrices::roster_csv;
use crate::export::{csv_attachment, ROSTER_PREFIX};
use crate::ingestion::batch::BatchReport;
use crate::models::Candidate;
use crate::roster::ingest::{extract_lcats, ingest_resumes};
use crate::routes::upload::{read_documents, read_single_document};
use crate::state::AppState;

#[derive(Serialize)]
pub struct LcatListResponse {
    pub lcats: Vec<String>,
}

/// GET /api/v1/lcats
pub async fn handle_get_lcats(State(state): State<AppState>) -> Json<LcatListResponse> {
    let session = state.session.read().await;
    Json(LcatListResponse {
        lcats: session.allowed_lcats().to_vec(),
    })
}

/// POST /api/v1/lcats
/// Replaces the allowed list with the titles found in one J-5 document. On failure the
/// previous list is kept.
pub async fn handle_upload_lcats(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<LcatListResponse>, AppError> {
    let _lane = state.enter_gateway_lane().await?;
    let credential = state.session.read().await.credential()?;
    let document = read_single_document(multipart).await?;

    let lcats = extract_lcats(state.gateway.as_ref(), &credential, &document)
        .await
        .map_err(|e| AppError::extraction("LCAT extraction", e))?;

    state.session.write().await.set_allowed_lcats(lcats.clone());
    Ok(Json(LcatListResponse { lcats }))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(State(state): State<AppState>) -> Json<Vec<Candidate>> {
    Json(state.session.read().await.candidates().to_vec())
}

/// POST /api/v1/candidates
/// Ingests every attached resume in order. Per-file failures are reported in the body.
/// The allowed list is read under the gateway lane so a J-5 upload queued ahead applies.
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchReport<Candidate>>, AppError> {
    let _lane = state.enter_gateway_lane().await?;
    let (credential, allowed_lcats) = {
        let session = state.session.read().await;
        (session.credential()?, session.require_allowed_lcats()?)
    };
    let documents = read_documents(multipart).await?;
    info!("Resume batch received: {} files", documents.len());

    let report = ingest_resumes(
        &state.session,
        state.gateway.as_ref(),
        &credential,
        &allowed_lcats,
        documents,
    )
    .await;
    Ok(Json(report))
}

/// DELETE /api/v1/candidates/:id
/// Assignments naming the candidate are left in place.
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state.session.write().await.remove_candidate(id);
    match removed {
        Some(candidate) => {
            info!("Removed candidate {} ({})", candidate.name, id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::NotFound(format!("Candidate {id} not found"))),
    }
}

/// GET /api/v1/candidates/export
pub async fn handle_export_roster(State(state): State<AppState>) -> Response {
    let body = roster_csv(state.session.read().await.candidates());
    csv_attachment(ROSTER_PREFIX, body)
}
