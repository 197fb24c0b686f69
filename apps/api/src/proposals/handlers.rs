use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::matrices::requirements_csv;
use crate::export::{csv_attachment, REQUIREMENTS_PREFIX};
use crate::ingestion::batch::BatchReport;
use crate::models::Proposal;
use crate::proposals::ingest::{extract_proposal_from_text, ingest_proposals};
use crate::routes::upload::read_documents;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PastedProposal {
    pub text: String,
}

/// GET /api/v1/proposals
pub async fn handle_list_proposals(State(state): State<AppState>) -> Json<Vec<Proposal>> {
    Json(state.session.read().await.proposals().to_vec())
}

/// POST /api/v1/proposals
pub async fn handle_upload_proposals(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchReport<Proposal>>, AppError> {
    let _lane = state.enter_gateway_lane().await?;
    let credential = state.session.read().await.credential()?;
    let documents = read_documents(multipart).await?;
    info!("Proposal batch received: {} files", documents.len());

    let report = ingest_proposals(
        &state.session,
        state.gateway.as_ref(),
        &credential,
        documents,
    )
    .await;
    Ok(Json(report))
}

/// POST /api/v1/proposals/text
pub async fn handle_paste_proposal(
    State(state): State<AppState>,
    Json(req): Json<PastedProposal>,
) -> Result<(StatusCode, Json<Proposal>), AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("Proposal text is empty".to_string()));
    }
    let _lane = state.enter_gateway_lane().await?;
    let credential = state.session.read().await.credential()?;

    let proposal = extract_proposal_from_text(state.gateway.as_ref(), &credential, &req.text)
        .await
        .map_err(|e| AppError::extraction("Proposal extraction", e))?;

    info!(
        "Added proposal '{}' with {} positions from pasted text",
        proposal.name,
        proposal.positions.len()
    );
    state.session.write().await.add_proposal(proposal.clone());
    Ok((StatusCode::CREATED, Json(proposal)))
}

/// DELETE /api/v1/proposals/:id
/// Removes the proposal with its positions. Assignments that referenced them stay.
pub async fn handle_delete_proposal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state.session.write().await.remove_proposal(id);
    let proposal = removed.ok_or_else(|| AppError::NotFound(format!("Proposal {id} not found")))?;
    info!("Removed proposal '{}' ({})", proposal.name, id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/proposals/export
pub async fn handle_export_requirements(State(state): State<AppState>) -> Response {
    let body = requirements_csv(state.session.read().await.proposals());
    csv_attachment(REQUIREMENTS_PREFIX, body)
}
