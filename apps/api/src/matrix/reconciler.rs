//! Staffing reconciler: derived views over (candidates, proposals, assignments).
//!
//! Everything here is a pure function of its inputs: no I/O, no hidden state, no
//! mutation. Re-deriving from an unchanged triple yields identical results.
//!
//! Reference inconsistencies (an assignment naming a removed candidate or position) are
//! never errors; they resolve as unresolved/vacant. Allocation limits the optimizer was
//! asked to respect are reported as findings, never corrected.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Assignment, Candidate, Position, Proposal};

/// Tolerance for FTE sums built from fractional loe values.
const FTE_EPSILON: f64 = 1e-9;

// ────────────────────────────────────────────────────────────────────────────
// Percentages
// ────────────────────────────────────────────────────────────────────────────

fn percent(ratio: f64) -> u32 {
    (ratio * 100.0).round().max(0.0) as u32
}

pub fn total_positions(proposals: &[Proposal]) -> usize {
    proposals.iter().map(|p| p.positions.len()).sum()
}

fn live_position_ids(proposals: &[Proposal]) -> HashSet<Uuid> {
    proposals
        .iter()
        .flat_map(|p| p.positions.iter().map(|pos| pos.id))
        .collect()
}

/// Distinct live positions that have at least one assignment.
pub fn filled_positions(proposals: &[Proposal], assignments: &[Assignment]) -> usize {
    let live = live_position_ids(proposals);
    assignments
        .iter()
        .map(|a| a.position_id)
        .filter(|id| live.contains(id))
        .collect::<HashSet<_>>()
        .len()
}

/// Share of all positions that are filled, as an integer percentage in [0, 100].
/// Zero positions means zero coverage.
pub fn coverage_percent(proposals: &[Proposal], assignments: &[Assignment]) -> u32 {
    let total = total_positions(proposals);
    if total == 0 {
        return 0;
    }
    percent(filled_positions(proposals, assignments) as f64 / total as f64).min(100)
}

/// Coverage restricted to one proposal's positions.
pub fn proposal_coverage_percent(proposal: &Proposal, assignments: &[Assignment]) -> u32 {
    coverage_percent(std::slice::from_ref(proposal), assignments)
}

/// Total FTE committed to a candidate id. Works for ids no longer in the roster.
pub fn allocated_fte(candidate_id: Uuid, assignments: &[Assignment]) -> f64 {
    assignments
        .iter()
        .filter(|a| a.candidate_id == candidate_id)
        .map(|a| a.assigned_loe)
        .sum()
}

/// `round(100 × Σ assignedLoe)`; 100 means exactly one FTE.
pub fn utilization_percent(candidate_id: Uuid, assignments: &[Assignment]) -> u32 {
    percent(allocated_fte(candidate_id, assignments))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationBand {
    /// 0%
    Idle,
    /// Between 0% and 50%, exclusive.
    Under,
    /// 90% through 110%.
    Optimal,
    /// Above 120%.
    Over,
    /// Anything else.
    Nominal,
}

impl UtilizationBand {
    pub fn classify(utilization_percent: u32) -> Self {
        match utilization_percent {
            u if u > 120 => UtilizationBand::Over,
            0 => UtilizationBand::Idle,
            u if u < 50 => UtilizationBand::Under,
            90..=110 => UtilizationBand::Optimal,
            _ => UtilizationBand::Nominal,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fill status and lookups
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FillStatus {
    /// Assignments whose proposal id matches, duplicates included.
    pub assigned: usize,
    pub total: usize,
}

pub fn fill_status(proposal: &Proposal, assignments: &[Assignment]) -> FillStatus {
    FillStatus {
        assigned: assignments
            .iter()
            .filter(|a| a.proposal_id == proposal.id)
            .count(),
        total: proposal.positions.len(),
    }
}

/// The authoritative assignment for a position: the first match in storage order.
pub fn assignment_for_position(position_id: Uuid, assignments: &[Assignment]) -> Option<&Assignment> {
    assignments.iter().find(|a| a.position_id == position_id)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateRef<'a> {
    Resolved(&'a Candidate),
    Unresolved(Uuid),
}

pub fn resolve_candidate<'a>(assignment: &Assignment, candidates: &'a [Candidate]) -> CandidateRef<'a> {
    candidates
        .iter()
        .find(|c| c.id == assignment.candidate_id)
        .map(CandidateRef::Resolved)
        .unwrap_or(CandidateRef::Unresolved(assignment.candidate_id))
}

/// Proposals ordered by name, case-insensitively, ties kept in session order.
pub fn sorted_by_name(proposals: &[Proposal]) -> Vec<&Proposal> {
    let mut sorted: Vec<&Proposal> = proposals.iter().collect();
    sorted.sort_by(|a, b| compare_names(&a.name, &b.name));
    sorted
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// ────────────────────────────────────────────────────────────────────────────
// Data-quality audit
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Σ assignedLoe for a candidate exceeds one FTE.
    CandidateOverAllocated { candidate_id: Uuid, allocated_fte: f64 },
    AssignedLoeExceedsPosition {
        assignment_id: Uuid,
        position_id: Uuid,
        assigned_loe: f64,
        position_loe: f64,
    },
    UnresolvedCandidate { assignment_id: Uuid, candidate_id: Uuid },
    UnresolvedPosition { assignment_id: Uuid, position_id: Uuid },
    /// The position exists but belongs to a different proposal than the assignment says.
    ProposalMismatch {
        assignment_id: Uuid,
        proposal_id: Uuid,
        position_id: Uuid,
    },
    /// Only the first assignment for the position is treated as authoritative.
    DuplicatePositionAssignment { position_id: Uuid, count: usize },
    LcatOutsideAllowedList { candidate_id: Uuid, lcat: String },
}

/// Lists every data-quality condition in the current dataset. Never corrects anything.
pub fn audit(
    candidates: &[Candidate],
    proposals: &[Proposal],
    assignments: &[Assignment],
    allowed_lcats: &[String],
) -> Vec<Finding> {
    let mut findings = Vec::new();

    let positions: HashMap<Uuid, (Uuid, &Position)> = proposals
        .iter()
        .flat_map(|p| p.positions.iter().map(move |pos| (pos.id, (p.id, pos))))
        .collect();
    let candidate_ids: HashSet<Uuid> = candidates.iter().map(|c| c.id).collect();

    for a in assignments {
        if !candidate_ids.contains(&a.candidate_id) {
            findings.push(Finding::UnresolvedCandidate {
                assignment_id: a.id,
                candidate_id: a.candidate_id,
            });
        }
        match positions.get(&a.position_id) {
            None => findings.push(Finding::UnresolvedPosition {
                assignment_id: a.id,
                position_id: a.position_id,
            }),
            Some((owner, position)) => {
                if *owner != a.proposal_id {
                    findings.push(Finding::ProposalMismatch {
                        assignment_id: a.id,
                        proposal_id: a.proposal_id,
                        position_id: a.position_id,
                    });
                }
                if a.assigned_loe > position.loe + FTE_EPSILON {
                    findings.push(Finding::AssignedLoeExceedsPosition {
                        assignment_id: a.id,
                        position_id: a.position_id,
                        assigned_loe: a.assigned_loe,
                        position_loe: position.loe,
                    });
                }
            }
        }
    }

    // Per-position and per-candidate groupings, in first-seen order.
    let mut position_counts: Vec<(Uuid, usize)> = Vec::new();
    let mut candidate_order: Vec<Uuid> = Vec::new();
    for a in assignments {
        match position_counts.iter_mut().find(|(id, _)| *id == a.position_id) {
            Some((_, count)) => *count += 1,
            None => position_counts.push((a.position_id, 1)),
        }
        if !candidate_order.contains(&a.candidate_id) {
            candidate_order.push(a.candidate_id);
        }
    }

    findings.extend(
        position_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(position_id, count)| Finding::DuplicatePositionAssignment { position_id, count }),
    );

    findings.extend(candidate_order.into_iter().filter_map(|candidate_id| {
        let fte = allocated_fte(candidate_id, assignments);
        (fte > 1.0 + FTE_EPSILON).then_some(Finding::CandidateOverAllocated {
            candidate_id,
            allocated_fte: fte,
        })
    }));

    if !allowed_lcats.is_empty() {
        findings.extend(
            candidates
                .iter()
                .filter(|c| !allowed_lcats.iter().any(|l| l == &c.lcat))
                .map(|c| Finding::LcatOutsideAllowedList {
                    candidate_id: c.id,
                    lcat: c.lcat.clone(),
                }),
        );
    }

    findings
}

// ────────────────────────────────────────────────────────────────────────────
// Matrix view
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Staffing {
    Vacant,
    Filled {
        assignment: Assignment,
        candidate: Candidate,
        /// Whether the assigned FTE equals the position's loe.
        full_loe: bool,
    },
    /// The assignment names a candidate that is no longer in the roster.
    Unresolved { assignment: Assignment },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub position: Position,
    pub staffing: Staffing,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalMatrix {
    pub proposal_id: Uuid,
    pub name: String,
    pub fill: FillStatus,
    pub coverage_percent: u32,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateUtilization {
    pub candidate_id: Uuid,
    pub name: String,
    pub utilization_percent: u32,
    pub band: UtilizationBand,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixView {
    pub coverage_percent: u32,
    pub total_positions: usize,
    pub filled_positions: usize,
    pub assignments: usize,
    pub proposals: Vec<ProposalMatrix>,
    pub utilization: Vec<CandidateUtilization>,
    pub findings: Vec<Finding>,
}

pub fn staffing_for(position: &Position, candidates: &[Candidate], assignments: &[Assignment]) -> Staffing {
    match assignment_for_position(position.id, assignments) {
        None => Staffing::Vacant,
        Some(assignment) => match resolve_candidate(assignment, candidates) {
            CandidateRef::Resolved(candidate) => Staffing::Filled {
                assignment: assignment.clone(),
                candidate: candidate.clone(),
                full_loe: (assignment.assigned_loe - position.loe).abs() <= FTE_EPSILON,
            },
            CandidateRef::Unresolved(_) => Staffing::Unresolved {
                assignment: assignment.clone(),
            },
        },
    }
}

pub fn build_matrix_view(
    candidates: &[Candidate],
    proposals: &[Proposal],
    assignments: &[Assignment],
    allowed_lcats: &[String],
) -> MatrixView {
    let proposal_views = sorted_by_name(proposals)
        .into_iter()
        .map(|p| ProposalMatrix {
            proposal_id: p.id,
            name: p.name.clone(),
            fill: fill_status(p, assignments),
            coverage_percent: proposal_coverage_percent(p, assignments),
            rows: p
                .positions
                .iter()
                .map(|pos| MatrixRow {
                    position: pos.clone(),
                    staffing: staffing_for(pos, candidates, assignments),
                })
                .collect(),
        })
        .collect();

    let utilization = candidates
        .iter()
        .map(|c| {
            let pct = utilization_percent(c.id, assignments);
            CandidateUtilization {
                candidate_id: c.id,
                name: c.name.clone(),
                utilization_percent: pct,
                band: UtilizationBand::classify(pct),
            }
        })
        .collect();

    MatrixView {
        coverage_percent: coverage_percent(proposals, assignments),
        total_positions: total_positions(proposals),
        filled_positions: filled_positions(proposals, assignments),
        assignments: assignments.len(),
        proposals: proposal_views,
        utilization,
        findings: audit(candidates, proposals, assignments, allowed_lcats),
    }
}
