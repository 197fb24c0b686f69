use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::ApiKey;
use crate::session::SessionSummary;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    pub api_key: String,
}

/// PUT /api/v1/session/credential
/// Held in memory for the life of the process; never persisted or echoed back.
pub async fn handle_set_credential(
    State(state): State<AppState>,
    Json(req): Json<CredentialRequest>,
) -> Result<StatusCode, AppError> {
    let key = ApiKey::new(req.api_key)
        .ok_or_else(|| AppError::Validation("API key must not be blank".to_string()))?;
    state.session.write().await.set_credential(key);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/session
pub async fn handle_session_summary(State(state): State<AppState>) -> Json<SessionSummary> {
    Json(state.session.read().await.summary())
}
