//! Session context: the credential, the allowed LCAT list and the three collections.
//!
//! Constructed once at startup and handed to every operation through `AppState`.
//! All mutation goes through the methods below; derived views never mutate.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ApiKey;
use crate::models::{Assignment, Candidate, Proposal};

pub type SharedSession = Arc<RwLock<Session>>;

#[derive(Debug, Default)]
pub struct Session {
    credential: Option<ApiKey>,
    allowed_lcats: Vec<String>,
    candidates: Vec<Candidate>,
    proposals: Vec<Proposal>,
    assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub has_credential: bool,
    pub allowed_lcats: usize,
    pub candidates: usize,
    pub proposals: usize,
    pub positions: usize,
    pub assignments: usize,
}

impl Session {
    pub fn new(credential: Option<ApiKey>) -> Self {
        Self {
            credential,
            ..Default::default()
        }
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn set_credential(&mut self, key: ApiKey) {
        self.credential = Some(key);
        info!("Session credential updated");
    }

    /// Every Gateway operation needs this first.
    pub fn credential(&self) -> Result<ApiKey, AppError> {
        self.credential.clone().ok_or(AppError::MissingCredential)
    }

    pub fn allowed_lcats(&self) -> &[String] {
        &self.allowed_lcats
    }

    /// Replaces the allowed list wholesale with the latest J-5 extraction.
    pub fn set_allowed_lcats(&mut self, lcats: Vec<String>) {
        info!("Allowed LCAT list set ({} titles)", lcats.len());
        self.allowed_lcats = lcats;
    }

    /// Resume ingestion maps candidates onto the J-5 list, so the list must exist.
    pub fn require_allowed_lcats(&self) -> Result<Vec<String>, AppError> {
        if self.allowed_lcats.is_empty() {
            return Err(AppError::MissingPrerequisite(
                "Upload a J-5 labor category definitions document first; \
                 candidates are mapped strictly onto its LCAT titles."
                    .to_string(),
            ));
        }
        Ok(self.allowed_lcats.clone())
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn add_candidate(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }

    /// Removes the candidate only. Assignments naming it stay and resolve as unresolved.
    pub fn remove_candidate(&mut self, id: Uuid) -> Option<Candidate> {
        let index = self.candidates.iter().position(|c| c.id == id)?;
        Some(self.candidates.remove(index))
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn add_proposal(&mut self, proposal: Proposal) {
        self.proposals.push(proposal);
    }

    /// Removes the proposal and its positions. Their assignments become orphans.
    pub fn remove_proposal(&mut self, id: Uuid) -> Option<Proposal> {
        let index = self.proposals.iter().position(|p| p.id == id)?;
        Some(self.proposals.remove(index))
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Discards the previous assignment set entirely. Returns how many were dropped.
    pub fn replace_assignments(&mut self, assignments: Vec<Assignment>) -> usize {
        let discarded = self.assignments.len();
        self.assignments = assignments;
        info!(
            "Assignments replaced: {} discarded, {} installed",
            discarded,
            self.assignments.len()
        );
        discarded
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            has_credential: self.credential.is_some(),
            allowed_lcats: self.allowed_lcats.len(),
            candidates: self.candidates.len(),
            proposals: self.proposals.len(),
            positions: self.proposals.iter().map(|p| p.positions.len()).sum(),
            assignments: self.assignments.len(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_credential_required_before_gateway_work() {
        let session = Session::new(None);
        assert!(matches!(
            session.credential(),
            Err(AppError::MissingCredential)
        ));
    }

    #[test]
    fn test_allowed_lcats_prerequisite() {
        let mut session = Session::new(None);
        assert!(matches!(
            session.require_allowed_lcats(),
            Err(AppError::MissingPrerequisite(_))
        ));
        session.set_allowed_lcats(vec!["Program Manager".to_string()]);
        assert_eq!(session.require_allowed_lcats().unwrap().len(), 1);
    }

    #[test]
    fn test_removing_candidate_keeps_assignments() {
        let mut session = Session::new(None);
        let c = candidate("Ada", "Systems Engineer");
        let pos = position("Lead", 1.0);
        let prop = proposal("Alpha", vec![pos.clone()]);
        session.replace_assignments(vec![assignment(prop.id, pos.id, c.id, 1.0)]);
        session.add_candidate(c.clone());
        session.add_proposal(prop);

        assert!(session.remove_candidate(c.id).is_some());
        assert!(session.candidates().is_empty());
        assert_eq!(session.assignments().len(), 1);
        assert!(session.remove_candidate(c.id).is_none());
    }

    #[test]
    fn test_replace_assignments_is_wholesale() {
        let mut session = Session::new(None);
        let first: Vec<_> = (0..3)
            .map(|_| assignment(new_uuid(), new_uuid(), new_uuid(), 1.0))
            .collect();
        session.replace_assignments(first);
        let second = vec![assignment(new_uuid(), new_uuid(), new_uuid(), 0.5)];
        let discarded = session.replace_assignments(second.clone());
        assert_eq!(discarded, 3);
        assert_eq!(session.assignments(), second.as_slice());
    }

    #[test]
    fn test_summary_counts_positions_across_proposals() {
        let mut session = Session::new(ApiKey::new("k"));
        session.add_proposal(proposal("A", vec![position("x", 1.0), position("y", 1.0)]));
        session.add_proposal(proposal("B", vec![position("z", 0.5)]));
        let summary = session.summary();
        assert!(summary.has_credential);
        assert_eq!(summary.proposals, 2);
        assert_eq!(summary.positions, 3);
    }

    fn new_uuid() -> Uuid {
        Uuid::new_v4()
    }
}
