// Roster Gateway prompt templates.
// All prompts for the roster module are defined here.

pub const LCAT_LIST_PROMPT: &str = r#"Analyze this J-5 / Labor Category Definition document.
Extract a comprehensive list of all distinct Labor Category (LCAT) titles defined in the text.

OUTPUT SCHEMA (return exactly this structure):
{
  "lcats": ["string"]
}

Example: {"lcats": ["Program Manager", "Systems Engineer", "Cyber Security Specialist"]}"#;

pub const RESUME_PROMPT: &str = r#"Analyze this resume for a Federal Government Contracting role.

{lcat_instruction}

Rules for Level Determination:
- Level I: 0-5 years
- Level II: 6-10 years
- Level III: 10-15 years
- Level IV: 15-20 years
- Level V: 20+ years or recognized SME.

If specific Clearance is not found, mark as "None".
If Location is not found, mark as "Unknown".

OUTPUT SCHEMA (return exactly this structure):
{
  "name": "string",                       // required
  "email": "string" | null,
  "lcat": "string",                       // required
  "level": "I" | "II" | "III" | "IV" | "V" | "PENDING",   // required
  "yearsExperience": number,              // required
  "education": "string",
  "certifications": ["string"],
  "clearance": "string",
  "location": "string",
  "summary": "string"                     // required: short summary of skills and justification for level
}"#;

pub const STRICT_LCAT_INSTRUCTION: &str = r#"*** CRITICAL REQUIREMENT ***
You MUST map this candidate to EXACTLY ONE of the following Labor Categories (LCATs).
Do NOT invent a new title. Do NOT use the candidate's current title if it is not in this list.
Select the closest fit from the list below based on their skills and experience:

ALLOWED J-5 LCATS:
{allowed_lcats}"#;

pub const OPEN_LCAT_INSTRUCTION: &str =
    "Determine the most appropriate Federal Labor Category for this candidate.";
