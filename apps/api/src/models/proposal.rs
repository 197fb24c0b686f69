use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{new_id, LcatLevel};

pub const DEFAULT_LOE: f64 = 1.0;
pub const DEFAULT_LOCATION: &str = "TBD";
pub const DEFAULT_CLEARANCE: &str = "None";
pub const DEFAULT_EDUCATION_REQ: &str = "None";

/// A staffing line item owned by exactly one proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: Uuid,
    pub title: String,
    pub lcat: String,
    pub level: LcatLevel,
    /// Fractional FTE. Conventionally 0 < loe <= 1.0 but not hard-capped.
    pub loe: f64,
    pub location: String,
    pub clearance: String,
    pub education_req: String,
    pub certifications_req: Vec<String>,
    pub skills_req: Vec<String>,
}

/// Position fields as far as extraction produced them. `None` means the source omitted
/// the field and the construction default applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionSpec {
    pub title: String,
    pub lcat: String,
    pub level: Option<LcatLevel>,
    pub loe: Option<f64>,
    pub location: Option<String>,
    pub clearance: Option<String>,
    pub education_req: Option<String>,
    pub certifications_req: Option<Vec<String>>,
    pub skills_req: Option<Vec<String>>,
}

impl Position {
    pub fn new(spec: PositionSpec) -> Self {
        Self {
            id: new_id(),
            title: spec.title,
            lcat: spec.lcat,
            level: spec.level.unwrap_or(LcatLevel::I),
            loe: spec.loe.unwrap_or(DEFAULT_LOE),
            location: spec.location.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            clearance: spec.clearance.unwrap_or_else(|| DEFAULT_CLEARANCE.to_string()),
            education_req: spec
                .education_req
                .unwrap_or_else(|| DEFAULT_EDUCATION_REQ.to_string()),
            certifications_req: spec.certifications_req.unwrap_or_default(),
            skills_req: spec.skills_req.unwrap_or_default(),
        }
    }

    /// Requirement fields flattened into one list: education first, then certifications.
    pub fn flattened_reqs(&self) -> Vec<String> {
        std::iter::once(self.education_req.clone())
            .chain(self.certifications_req.iter().cloned())
            .collect()
    }
}

/// A named collection of positions. Owns its positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,
    pub name: String,
    pub positions: Vec<Position>,
}

impl Proposal {
    pub fn new(name: String, positions: Vec<Position>) -> Self {
        Self {
            id: new_id(),
            name,
            positions,
        }
    }
}
