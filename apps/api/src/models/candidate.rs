use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::LcatLevel;

/// A person profile extracted from one resume. Immutable once created; removed only by
/// explicit user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Labor category title. Open-ended: it must match externally defined J-5 titles.
    pub lcat: String,
    pub level: LcatLevel,
    pub years_experience: f64,
    pub education: String,
    /// Order-preserving; duplicates are kept as the source provided them.
    pub certifications: Vec<String>,
    pub clearance: String,
    pub location: String,
    pub summary: String,
}

impl Candidate {
    pub fn certifications_joined(&self) -> String {
        self.certifications.join("; ")
    }
}
