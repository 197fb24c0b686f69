//! The three tabular projections: roster, requirements and staffing.

use crate::export::csv::{write_csv, CsvCell};
use crate::matrix::reconciler::{
    assignment_for_position, resolve_candidate, sorted_by_name, CandidateRef,
};
use crate::models::{Assignment, Candidate, Proposal};

pub const ROSTER_HEADERS: [&str; 9] = [
    "Name",
    "LCAT",
    "Level",
    "Years Experience",
    "Education",
    "Clearance",
    "Location",
    "Summary",
    "Certifications",
];

pub const REQUIREMENTS_HEADERS: [&str; 10] = [
    "Proposal Name",
    "Position Title",
    "Required LCAT",
    "Required Level",
    "LOE (FTE)",
    "Location",
    "Education",
    "Certifications",
    "Clearance Required",
    "Skills",
];

pub const STAFFING_HEADERS: [&str; 11] = [
    "Proposal Name",
    "Position Title",
    "Required LCAT",
    "Required Level",
    "Location",
    "Assigned Candidate Name",
    "Candidate LCAT",
    "Candidate Level",
    "Fit Score",
    "Assigned FTE",
    "Fit Reason",
];

const VACANT: &str = "VACANT";

/// One row per candidate in roster order.
pub fn roster_csv(candidates: &[Candidate]) -> String {
    let rows: Vec<Vec<CsvCell>> = candidates
        .iter()
        .map(|c| -> Vec<CsvCell> {
            vec![
                c.name.as_str().into(),
                c.lcat.as_str().into(),
                c.level.to_string().into(),
                c.years_experience.into(),
                c.education.as_str().into(),
                c.clearance.as_str().into(),
                c.location.as_str().into(),
                c.summary.as_str().into(),
                c.certifications_joined().into(),
            ]
        })
        .collect();
    write_csv(&ROSTER_HEADERS, &rows)
}

/// One row per position, proposals in session order.
pub fn requirements_csv(proposals: &[Proposal]) -> String {
    let rows: Vec<Vec<CsvCell>> = proposals
        .iter()
        .flat_map(|p| {
            p.positions.iter().map(move |pos| -> Vec<CsvCell> {
                vec![
                    p.name.as_str().into(),
                    pos.title.as_str().into(),
                    pos.lcat.as_str().into(),
                    pos.level.to_string().into(),
                    pos.loe.into(),
                    pos.location.as_str().into(),
                    pos.education_req.as_str().into(),
                    pos.certifications_req.join("; ").into(),
                    pos.clearance.as_str().into(),
                    pos.skills_req.join("; ").into(),
                ]
            })
        })
        .collect();
    write_csv(&REQUIREMENTS_HEADERS, &rows)
}

/// One row per position, proposals sorted by name. Positions without an assignment, or
/// whose assigned candidate has been removed, read VACANT.
pub fn staffing_csv(
    candidates: &[Candidate],
    proposals: &[Proposal],
    assignments: &[Assignment],
) -> String {
    let rows: Vec<Vec<CsvCell>> = sorted_by_name(proposals)
        .into_iter()
        .flat_map(|p| {
            p.positions.iter().map(move |pos| -> Vec<CsvCell> {
                let assignment = assignment_for_position(pos.id, assignments);
                let candidate = match assignment.map(|a| resolve_candidate(a, candidates)) {
                    Some(CandidateRef::Resolved(c)) => Some(c),
                    _ => None,
                };
                vec![
                    p.name.as_str().into(),
                    pos.title.as_str().into(),
                    pos.lcat.as_str().into(),
                    pos.level.to_string().into(),
                    pos.location.as_str().into(),
                    candidate.map_or(VACANT, |c| c.name.as_str()).into(),
                    candidate.map(|c| c.lcat.as_str()).into(),
                    candidate.map(|c| c.level.to_string()).into(),
                    assignment.map(|a| a.score).into(),
                    assignment.map(|a| a.assigned_loe).into(),
                    assignment.map(|a| a.reasoning.as_str()).into(),
                ]
            })
        })
        .collect();
    write_csv(&STAFFING_HEADERS, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fixtures::{assignment, candidate, position, proposal};

    #[test]
    fn test_roster_joins_certifications() {
        let mut ada = candidate("Ada", "Systems Engineer");
        ada.certifications = vec!["CISSP".to_string(), "PMP".to_string()];
        let out = roster_csv(&[ada]);
        let mut lines = out.lines();
        assert_eq!(lines.next().unwrap(), ROSTER_HEADERS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"Ada\",\"Systems Engineer\",\"II\",\"8\""));
        assert!(row.ends_with("\"CISSP; PMP\""));
    }

    #[test]
    fn test_requirements_has_one_row_per_position() {
        let p = proposal("Alpha", vec![position("Lead", 1.0), position("Dev", 0.5)]);
        let out = requirements_csv(&[p]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], REQUIREMENTS_HEADERS.join(","));
        assert!(lines[2].contains("\"Dev\""));
        assert!(lines[2].contains("\"0.5\""));
    }

    #[test]
    fn test_staffing_sorts_by_name_and_marks_vacancies() {
        let ada = candidate("Ada", "Systems Engineer");
        let x = position("Lead", 1.0);
        let zulu = proposal("Zulu", vec![x.clone()]);
        let alpha = proposal("Alpha", vec![position("Dev", 1.0)]);
        let assignments = vec![assignment(zulu.id, x.id, ada.id, 1.0)];

        let out = staffing_csv(&[ada], &[zulu, alpha], &assignments);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], STAFFING_HEADERS.join(","));
        assert!(lines[1].starts_with("\"Alpha\""));
        assert!(lines[1].contains("\"VACANT\",\"\",\"\",\"\",\"\",\"\""));
        assert!(lines[2].starts_with("\"Zulu\""));
        assert!(lines[2].contains("\"Ada\",\"Systems Engineer\",\"II\",\"85\",\"1\""));
    }

    #[test]
    fn test_staffing_with_removed_candidate_reads_vacant_but_keeps_assignment_fields() {
        let ada = candidate("Ada", "Systems Engineer");
        let x = position("Lead", 1.0);
        let p = proposal("Alpha", vec![x.clone()]);
        let assignments = vec![assignment(p.id, x.id, ada.id, 0.5)];

        let out = staffing_csv(&[], &[p], &assignments);
        let row = out.lines().nth(1).unwrap();
        assert!(row.contains("\"VACANT\",\"\",\"\",\"85\",\"0.5\""));
    }
}
