// Proposals: RFP/SOW staffing tables extracted into positions.

pub mod handlers;
pub mod ingest;
pub mod prompts;
