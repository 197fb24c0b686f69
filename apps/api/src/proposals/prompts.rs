// Proposal Gateway prompt templates.

pub const PROPOSAL_PROMPT: &str = r#"Analyze this RFP/SOW document. Extract all staffing positions.
For each position, identify the Title, LCAT, Level (I-V), LOE (FTE), Location, Clearance,
and specific Education/Cert requirements.

If hours are listed instead of FTE, convert 1880 or 1920 hours to 1.0 FTE
(any figure in the 1880-1920 hour range is exactly 1.0 FTE; scale other hour counts by 1920).

OUTPUT SCHEMA (return exactly this structure):
{
  "proposalName": "string",
  "positions": [
    {
      "title": "string",                          // required
      "lcat": "string",                           // required: the Labor Category name
      "level": "I" | "II" | "III" | "IV" | "V",
      "loe": number,                              // FTE count, e.g. 1.0
      "location": "string",
      "clearance": "string",
      "educationReq": "string",
      "certificationsReq": ["string"],
      "skillsReq": ["string"]
    }
  ]
}"#;

pub const PASTED_TEXT_HEADER: &str = "Proposal Text:";
