//! Staffing optimization adapter.
//!
//! Flow: minimize candidates and proposals into digests → one Gateway call →
//! validate every returned assignment → fresh local ids. The caller replaces the
//! session's assignment set wholesale with the result.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingestion::response::{finite, id, parse_response, required_text};
use crate::ingestion::ExtractionError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SHAPE_INSTRUCTION};
use crate::llm_client::{ApiKey, Gateway, GatewayRequest};
use crate::matrix::prompts::OPTIMIZE_PROMPT;
use crate::models::{new_id, Assignment, Candidate, LcatLevel, Proposal};
use crate::session::Session;

// ────────────────────────────────────────────────────────────────────────────
// Request digests (matching-relevant fields only)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CandidateDigest<'a> {
    id: Uuid,
    name: &'a str,
    lcat: &'a str,
    level: LcatLevel,
    edu: &'a str,
    certs: &'a [String],
    clearance: &'a str,
}

#[derive(Debug, Serialize)]
struct ProposalDigest<'a> {
    id: Uuid,
    name: &'a str,
    positions: Vec<PositionDigest<'a>>,
}

#[derive(Debug, Serialize)]
struct PositionDigest<'a> {
    id: Uuid,
    title: &'a str,
    lcat: &'a str,
    level: LcatLevel,
    loe: f64,
    clearance: &'a str,
    reqs: Vec<String>,
    skills: &'a [String],
}

fn candidate_digests(candidates: &[Candidate]) -> Vec<CandidateDigest<'_>> {
    candidates
        .iter()
        .map(|c| CandidateDigest {
            id: c.id,
            name: &c.name,
            lcat: &c.lcat,
            level: c.level,
            edu: &c.education,
            certs: &c.certifications,
            clearance: &c.clearance,
        })
        .collect()
}

fn proposal_digests(proposals: &[Proposal]) -> Vec<ProposalDigest<'_>> {
    proposals
        .iter()
        .map(|p| ProposalDigest {
            id: p.id,
            name: &p.name,
            positions: p
                .positions
                .iter()
                .map(|pos| PositionDigest {
                    id: pos.id,
                    title: &pos.title,
                    lcat: &pos.lcat,
                    level: pos.level,
                    loe: pos.loe,
                    clearance: &pos.clearance,
                    reqs: pos.flattened_reqs(),
                    skills: &pos.skills_req,
                })
                .collect(),
        })
        .collect()
}

pub fn optimization_instruction(
    candidates: &[Candidate],
    proposals: &[Proposal],
) -> Result<String, ExtractionError> {
    let candidates = serde_json::to_string(&candidate_digests(candidates))?;
    let proposals = serde_json::to_string(&proposal_digests(proposals))?;
    Ok(format!(
        "{}\n\n{SHAPE_INSTRUCTION}",
        OPTIMIZE_PROMPT
            .replace("{candidates}", &candidates)
            .replace("{proposals}", &proposals)
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Response validation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawAssignments {
    assignments: Option<Vec<RawAssignment>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssignment {
    proposal_id: Option<String>,
    position_id: Option<String>,
    candidate_id: Option<String>,
    score: Option<f64>,
    reasoning: Option<String>,
    assigned_loe: Option<f64>,
}

fn assignment_from_raw(raw: RawAssignment, index: usize) -> Result<Assignment, ExtractionError> {
    let field = |name: &str| format!("assignments[{index}].{name}");
    let number = |value: Option<f64>, name: &str| {
        value
            .ok_or_else(|| {
                ExtractionError::shape(format!("missing required field '{}'", field(name)))
            })
            .and_then(|v| finite(v, &field(name)))
    };

    let score = number(raw.score, "score")?;
    if !(0.0..=100.0).contains(&score) {
        return Err(ExtractionError::shape(format!(
            "'{}' must be within 0-100, got {score}",
            field("score")
        )));
    }
    let assigned_loe = number(raw.assigned_loe, "assignedLoe")?;
    if assigned_loe <= 0.0 {
        return Err(ExtractionError::shape(format!(
            "'{}' must be positive, got {assigned_loe}",
            field("assignedLoe")
        )));
    }

    let reference = |value: Option<String>, name: &str| {
        required_text(value, &field(name)).and_then(|v| id(&v, &field(name)))
    };

    Ok(Assignment {
        id: new_id(),
        proposal_id: reference(raw.proposal_id, "proposalId")?,
        position_id: reference(raw.position_id, "positionId")?,
        candidate_id: reference(raw.candidate_id, "candidateId")?,
        score,
        reasoning: required_text(raw.reasoning, &field("reasoning"))?,
        assigned_loe,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Optimization run
// ────────────────────────────────────────────────────────────────────────────

/// Snapshot of the optimization inputs. Fails locally, before any Gateway call, when
/// there is nothing to match.
pub fn optimization_inputs(
    session: &Session,
) -> Result<(Vec<Candidate>, Vec<Proposal>), AppError> {
    if session.candidates().is_empty() {
        return Err(AppError::MissingPrerequisite(
            "Ingest at least one resume before running optimization.".to_string(),
        ));
    }
    if session.proposals().iter().all(|p| p.positions.is_empty()) {
        return Err(AppError::MissingPrerequisite(
            "Add at least one proposal with positions before running optimization.".to_string(),
        ));
    }
    Ok((session.candidates().to_vec(), session.proposals().to_vec()))
}

/// Runs one optimization. Returned ids are trusted as given: references to unknown
/// entities are kept and surface later as unresolved.
pub async fn optimize_staffing(
    gateway: &dyn Gateway,
    credential: &ApiKey,
    candidates: &[Candidate],
    proposals: &[Proposal],
) -> Result<Vec<Assignment>, ExtractionError> {
    let request = GatewayRequest {
        system: JSON_ONLY_SYSTEM,
        instruction: optimization_instruction(candidates, proposals)?,
        document: None,
    };
    let raw = gateway.complete(credential, &request).await?;
    let parsed: RawAssignments = parse_response(&raw)?;
    let assignments = parsed
        .assignments
        .ok_or_else(|| ExtractionError::shape("missing required field 'assignments'"))?
        .into_iter()
        .enumerate()
        .map(|(index, a)| assignment_from_raw(a, index))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Optimization produced {} assignments for {} candidates",
        assignments.len(),
        candidates.len()
    );
    Ok(assignments)
}
