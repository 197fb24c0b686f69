//! J-5 and resume extraction adapters.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::info;

use crate::ingestion::batch::{run_sequential_batch, BatchReport};
use crate::ingestion::payload::UploadedDocument;
use crate::ingestion::response::{
    finite, level, optional_text, parse_response, required_text, text_list,
};
use crate::ingestion::ExtractionError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SHAPE_INSTRUCTION};
use crate::llm_client::{ApiKey, Gateway, GatewayRequest};
use crate::models::{new_id, Candidate};
use crate::roster::prompts::{
    LCAT_LIST_PROMPT, OPEN_LCAT_INSTRUCTION, RESUME_PROMPT, STRICT_LCAT_INSTRUCTION,
};
use crate::session::SharedSession;

const DEFAULT_CLEARANCE: &str = "None";
const DEFAULT_LOCATION: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct RawLcatList {
    lcats: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCandidate {
    name: Option<String>,
    email: Option<String>,
    lcat: Option<String>,
    level: Option<String>,
    years_experience: Option<f64>,
    education: Option<String>,
    certifications: Option<Vec<String>>,
    clearance: Option<String>,
    location: Option<String>,
    summary: Option<String>,
}

/// Extracts the ordered, distinct LCAT titles from one J-5 document.
pub async fn extract_lcats(
    gateway: &dyn Gateway,
    credential: &ApiKey,
    document: &UploadedDocument,
) -> Result<Vec<String>, ExtractionError> {
    let request = GatewayRequest {
        system: JSON_ONLY_SYSTEM,
        instruction: format!("{LCAT_LIST_PROMPT}\n\n{SHAPE_INSTRUCTION}"),
        document: Some(document.to_payload()?),
    };
    let raw = gateway.complete(credential, &request).await?;
    let parsed: RawLcatList = parse_response(&raw)?;
    let lcats = distinct_titles(parsed.lcats.unwrap_or_default());

    if lcats.is_empty() {
        return Err(ExtractionError::shape(
            "no labor category titles found in the document",
        ));
    }
    info!("Extracted {} LCAT titles from {}", lcats.len(), document.name);
    Ok(lcats)
}

/// Trims, drops blanks and removes case-insensitive repeats, keeping first occurrence.
fn distinct_titles(titles: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}

pub fn resume_instruction(allowed_lcats: &[String]) -> String {
    let lcat_instruction = if allowed_lcats.is_empty() {
        OPEN_LCAT_INSTRUCTION.to_string()
    } else {
        let list = serde_json::to_string(allowed_lcats).unwrap_or_default();
        STRICT_LCAT_INSTRUCTION.replace("{allowed_lcats}", &list)
    };
    format!(
        "{}\n\n{SHAPE_INSTRUCTION}",
        RESUME_PROMPT.replace("{lcat_instruction}", &lcat_instruction)
    )
}

/// Extracts one candidate from one resume. The returned candidate carries a fresh id.
pub async fn extract_candidate(
    gateway: &dyn Gateway,
    credential: &ApiKey,
    allowed_lcats: &[String],
    document: &UploadedDocument,
) -> Result<Candidate, ExtractionError> {
    let request = GatewayRequest {
        system: JSON_ONLY_SYSTEM,
        instruction: resume_instruction(allowed_lcats),
        document: Some(document.to_payload()?),
    };
    let raw = gateway.complete(credential, &request).await?;
    candidate_from_raw(parse_response(&raw)?)
}

fn candidate_from_raw(raw: RawCandidate) -> Result<Candidate, ExtractionError> {
    let level_symbol = required_text(raw.level, "level")?;
    let years = raw
        .years_experience
        .ok_or_else(|| ExtractionError::shape("missing required field 'yearsExperience'"))?;
    let years = finite(years, "yearsExperience")?;
    if years < 0.0 {
        return Err(ExtractionError::shape("'yearsExperience' is negative"));
    }

    Ok(Candidate {
        id: new_id(),
        name: required_text(raw.name, "name")?,
        email: optional_text(raw.email),
        lcat: required_text(raw.lcat, "lcat")?,
        level: level(&level_symbol, "level")?,
        years_experience: years,
        education: optional_text(raw.education).unwrap_or_default(),
        certifications: text_list(raw.certifications).unwrap_or_default(),
        clearance: optional_text(raw.clearance).unwrap_or_else(|| DEFAULT_CLEARANCE.to_string()),
        location: optional_text(raw.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        summary: required_text(raw.summary, "summary")?,
    })
}

/// Ingests resumes one at a time, appending each candidate as soon as it parses.
pub async fn ingest_resumes(
    session: &SharedSession,
    gateway: &dyn Gateway,
    credential: &ApiKey,
    allowed_lcats: &[String],
    documents: Vec<UploadedDocument>,
) -> BatchReport<Candidate> {
    run_sequential_batch(
        session,
        documents,
        move |document| async move {
            extract_candidate(gateway, credential, allowed_lcats, &document).await
        },
        |s, candidate| s.add_candidate(candidate),
    )
    .await
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::llm_client::testing::{key, ScriptedGateway};
    use crate::models::LcatLevel;
    use crate::session::Session;

    const ADA: &str = r#"{"name":"Ada Byron","lcat":"Systems Engineer","level":"III",
        "yearsExperience":12,"education":"MS Mathematics","certifications":["CISSP","PMP"],
        "clearance":"TS/SCI","location":"Dahlgren, VA","summary":"Analytical engines"}"#;

    fn resume(name: &str) -> UploadedDocument {
        UploadedDocument::new(
            name,
            Some("application/pdf".to_string()),
            Bytes::from_static(b"%PDF-1.7 resume"),
        )
    }

    #[tokio::test]
    async fn test_extract_lcats_dedupes_and_keeps_order() {
        let gateway = ScriptedGateway::new(vec![Ok(
            r#"```json
            {"lcats": ["Program Manager", " Systems Engineer ", "program manager", "", "Analyst"]}
            ```"#,
        )]);
        let lcats = extract_lcats(&gateway, &key(), &resume("j5.pdf")).await.unwrap();
        assert_eq!(lcats, vec!["Program Manager", "Systems Engineer", "Analyst"]);
    }

    #[tokio::test]
    async fn test_extract_lcats_empty_list_is_failure() {
        let gateway = ScriptedGateway::new(vec![Ok(r#"{"lcats": []}"#)]);
        let result = extract_lcats(&gateway, &key(), &resume("j5.pdf")).await;
        assert!(matches!(result, Err(ExtractionError::Shape(_))));
    }

    #[tokio::test]
    async fn test_candidate_extraction_assigns_local_identity() {
        let gateway = ScriptedGateway::new(vec![Ok(ADA), Ok(ADA)]);
        let allowed = vec!["Systems Engineer".to_string()];
        let a = extract_candidate(&gateway, &key(), &allowed, &resume("a.pdf"))
            .await
            .unwrap();
        let b = extract_candidate(&gateway, &key(), &allowed, &resume("b.pdf"))
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.level, LcatLevel::III);
        assert_eq!(a.certifications, vec!["CISSP", "PMP"]);
    }

    #[tokio::test]
    async fn test_candidate_ignores_externally_supplied_id() {
        let gateway = ScriptedGateway::new(vec![Ok(
            r#"{"id":"00000000-0000-0000-0000-000000000001","name":"Grace","lcat":"Analyst",
                "level":"I","yearsExperience":2,"summary":"COBOL"}"#,
        )]);
        let c = extract_candidate(&gateway, &key(), &[], &resume("g.pdf"))
            .await
            .unwrap();
        assert_ne!(c.id.to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[tokio::test]
    async fn test_candidate_optional_fields_get_fallbacks() {
        let gateway = ScriptedGateway::new(vec![Ok(
            r#"{"name":"Grace","lcat":"Analyst","level":"PENDING","yearsExperience":0,"summary":"New"}"#,
        )]);
        let c = extract_candidate(&gateway, &key(), &[], &resume("g.pdf"))
            .await
            .unwrap();
        assert_eq!(c.clearance, "None");
        assert_eq!(c.location, "Unknown");
        assert_eq!(c.education, "");
        assert!(c.certifications.is_empty());
        assert_eq!(c.level, LcatLevel::Pending);
    }

    #[tokio::test]
    async fn test_candidate_with_unknown_level_is_rejected() {
        let gateway = ScriptedGateway::new(vec![Ok(
            r#"{"name":"Grace","lcat":"Analyst","level":"Senior","yearsExperience":3,"summary":"x"}"#,
        )]);
        let result = extract_candidate(&gateway, &key(), &[], &resume("g.pdf")).await;
        assert!(matches!(result, Err(ExtractionError::Shape(_))));
    }

    #[tokio::test]
    async fn test_candidate_with_negative_years_is_rejected() {
        let gateway = ScriptedGateway::new(vec![Ok(
            r#"{"name":"Grace","lcat":"Analyst","level":"I","yearsExperience":-1,"summary":"x"}"#,
        )]);
        let result = extract_candidate(&gateway, &key(), &[], &resume("g.pdf")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unsupported_file_never_reaches_gateway() {
        let gateway = ScriptedGateway::new(vec![Ok(ADA)]);
        let doc = UploadedDocument::new("cv.docx", None, Bytes::from_static(b"PK"));
        let result = extract_candidate(&gateway, &key(), &[], &doc).await;
        assert!(matches!(result, Err(ExtractionError::UnsupportedDocument(_))));
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_resume_instruction_lists_allowed_titles() {
        let text = resume_instruction(&["Program Manager".to_string()]);
        assert!(text.contains(r#"["Program Manager"]"#));
        assert!(text.contains("EXACTLY ONE"));
        let open = resume_instruction(&[]);
        assert!(!open.contains("EXACTLY ONE"));
    }

    #[tokio::test]
    async fn test_batch_of_three_with_middle_failure_adds_two_in_order() {
        let grace = r#"{"name":"Grace Hopper","lcat":"Systems Engineer","level":"V",
            "yearsExperience":30,"summary":"Compilers"}"#;
        let gateway = ScriptedGateway::new(vec![Ok(ADA), Err("upstream timeout"), Ok(grace)]);
        let session = Session::new(None).shared();
        let allowed = vec!["Systems Engineer".to_string()];

        let report = ingest_resumes(
            &session,
            &gateway,
            &key(),
            &allowed,
            vec![resume("1.pdf"), resume("2.pdf"), resume("3.pdf")],
        )
        .await;

        assert_eq!(report.added.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "2.pdf");

        let guard = session.read().await;
        let names: Vec<_> = guard.candidates().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ada Byron", "Grace Hopper"]);
        assert_eq!(gateway.calls(), 3);
    }
}
