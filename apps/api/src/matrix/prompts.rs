// Staffing optimization prompt template.

pub const OPTIMIZE_PROMPT: &str = r#"Perform Staffing Optimization. Match candidates to proposal positions.

Candidates: {candidates}
Proposals: {proposals}

Rules:
1. Match candidates to positions based on LCAT match, Level, Education, Certifications, Clearance, and Skills.
2. LCAT alignment is the PRIMARY matching criterion: a candidate's lcat should match or closely align with the position's lcat.
3. A Candidate cannot be assigned to more than 1.0 FTE total across all proposals.
4. assignedLoe should equal the position's loe value.
5. Maximize the 'score' (0-100) based on overall fit quality.
6. Provide a brief reasoning for each match explaining why this candidate fits.
7. Use the EXACT id values from the input data for proposalId, positionId, and candidateId.
8. If no suitable candidate exists for a position, omit that position from assignments.

OUTPUT SCHEMA (return exactly this structure):
{
  "assignments": [
    {
      "proposalId": "string",     // exact proposal id from input
      "positionId": "string",     // exact position id from input
      "candidateId": "string",    // exact candidate id from input
      "score": number,            // fit score 0-100
      "reasoning": "string",      // brief justification for this match
      "assignedLoe": number       // FTE assigned, e.g. 1.0
    }
  ]
}"#;
