//! RFP/SOW extraction adapter.

use serde::Deserialize;
use tracing::info;

use crate::ingestion::batch::{run_sequential_batch, BatchReport};
use crate::ingestion::payload::UploadedDocument;
use crate::ingestion::response::{
    finite, level, optional_text, parse_response, required_text, text_list,
};
use crate::ingestion::ExtractionError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SHAPE_INSTRUCTION};
use crate::llm_client::{ApiKey, DocumentPayload, Gateway, GatewayRequest};
use crate::models::proposal::PositionSpec;
use crate::models::{Position, Proposal};
use crate::proposals::prompts::{PASTED_TEXT_HEADER, PROPOSAL_PROMPT};
use crate::session::SharedSession;

const DEFAULT_PROPOSAL_NAME: &str = "Parsed Proposal";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProposal {
    proposal_name: Option<String>,
    positions: Option<Vec<RawPosition>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPosition {
    title: Option<String>,
    lcat: Option<String>,
    level: Option<String>,
    loe: Option<f64>,
    location: Option<String>,
    clearance: Option<String>,
    education_req: Option<String>,
    certifications_req: Option<Vec<String>>,
    skills_req: Option<Vec<String>>,
}

/// Extracts a proposal from an uploaded document.
pub async fn extract_proposal(
    gateway: &dyn Gateway,
    credential: &ApiKey,
    document: &UploadedDocument,
) -> Result<Proposal, ExtractionError> {
    let request = GatewayRequest {
        system: JSON_ONLY_SYSTEM,
        instruction: format!("{PROPOSAL_PROMPT}\n\n{SHAPE_INSTRUCTION}"),
        document: Some(document.to_payload()?),
    };
    let proposal = request_proposal(gateway, credential, &request).await?;
    info!(
        "Extracted proposal '{}' ({} positions) from {}",
        proposal.name,
        proposal.positions.len(),
        document.name
    );
    Ok(proposal)
}

/// Extracts a proposal from pasted solicitation text.
pub async fn extract_proposal_from_text(
    gateway: &dyn Gateway,
    credential: &ApiKey,
    text: &str,
) -> Result<Proposal, ExtractionError> {
    let request = GatewayRequest {
        system: JSON_ONLY_SYSTEM,
        instruction: format!("{PROPOSAL_PROMPT}\n\n{SHAPE_INSTRUCTION}"),
        document: Some(DocumentPayload::Text(format!(
            "{PASTED_TEXT_HEADER}\n{}",
            text.trim()
        ))),
    };
    request_proposal(gateway, credential, &request).await
}

async fn request_proposal(
    gateway: &dyn Gateway,
    credential: &ApiKey,
    request: &GatewayRequest,
) -> Result<Proposal, ExtractionError> {
    let raw = gateway.complete(credential, request).await?;
    proposal_from_raw(parse_response(&raw)?)
}

fn proposal_from_raw(raw: RawProposal) -> Result<Proposal, ExtractionError> {
    let positions = raw
        .positions
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, p)| position_from_raw(p, index))
        .collect::<Result<Vec<_>, _>>()?;

    let name =
        optional_text(raw.proposal_name).unwrap_or_else(|| DEFAULT_PROPOSAL_NAME.to_string());
    Ok(Proposal::new(name, positions))
}

fn position_from_raw(raw: RawPosition, index: usize) -> Result<Position, ExtractionError> {
    let field = |name: &str| format!("positions[{index}].{name}");

    let position_level = match optional_text(raw.level) {
        Some(symbol) => {
            let parsed = level(&symbol, &field("level"))?;
            if !parsed.is_staffable() {
                return Err(ExtractionError::shape(format!(
                    "'{}' must be one of I-V",
                    field("level")
                )));
            }
            Some(parsed)
        }
        None => None,
    };

    let loe = match raw.loe {
        Some(value) => {
            let value = finite(value, &field("loe"))?;
            if value <= 0.0 {
                return Err(ExtractionError::shape(format!(
                    "'{}' must be positive, got {value}",
                    field("loe")
                )));
            }
            Some(value)
        }
        None => None,
    };

    Ok(Position::new(PositionSpec {
        title: required_text(raw.title, &field("title"))?,
        lcat: required_text(raw.lcat, &field("lcat"))?,
        level: position_level,
        loe,
        location: optional_text(raw.location),
        clearance: optional_text(raw.clearance),
        education_req: optional_text(raw.education_req),
        certifications_req: text_list(raw.certifications_req),
        skills_req: text_list(raw.skills_req),
    }))
}

/// Ingests proposal documents one at a time.
pub async fn ingest_proposals(
    session: &SharedSession,
    gateway: &dyn Gateway,
    credential: &ApiKey,
    documents: Vec<UploadedDocument>,
) -> BatchReport<Proposal> {
    run_sequential_batch(
        session,
        documents,
        move |document| async move { extract_proposal(gateway, credential, &document).await },
        |s, proposal| s.add_proposal(proposal),
    )
    .await
}
