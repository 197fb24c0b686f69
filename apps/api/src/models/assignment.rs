use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A candidate-to-position binding produced by an optimization run.
///
/// `proposal_id`, `position_id` and `candidate_id` are weak references: they may name
/// entities that have since been removed, in which case consumers treat them as
/// unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub proposal_id: Uuid,
    pub position_id: Uuid,
    pub candidate_id: Uuid,
    /// Fit score, 0-100 inclusive.
    pub score: f64,
    pub reasoning: String,
    /// FTE committed to this position. Should not exceed the position's loe, and a
    /// candidate's total should not exceed 1.0; neither is enforced here.
    pub assigned_loe: f64,
}
