//! Untrusted-boundary helpers: every Gateway response is cleaned, parsed into a
//! permissive raw shape, then checked field by field.

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::ingestion::ExtractionError;
use crate::llm_client::strip_json_fences;
use crate::models::LcatLevel;

/// Strips code fences and deserializes.
pub fn parse_response<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractionError> {
    let cleaned = strip_json_fences(raw);
    Ok(serde_json::from_str(cleaned)?)
}

/// A required string: present and not blank after trimming.
pub fn required_text(value: Option<String>, field: &str) -> Result<String, ExtractionError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ExtractionError::shape(format!("missing required field '{field}'")))
}

/// An optional string: blank counts as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims entries and drops blanks; order and duplicates are kept.
pub fn text_list(values: Option<Vec<String>>) -> Option<Vec<String>> {
    values.map(|list| {
        list.into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    })
}

pub fn level(value: &str, field: &str) -> Result<LcatLevel, ExtractionError> {
    value
        .parse::<LcatLevel>()
        .map_err(|e| ExtractionError::shape(format!("'{field}': {e}")))
}

pub fn finite(value: f64, field: &str) -> Result<f64, ExtractionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExtractionError::shape(format!("'{field}' is not a finite number")))
    }
}

pub fn id(value: &str, field: &str) -> Result<Uuid, ExtractionError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| ExtractionError::shape(format!("'{field}' is not a known id: '{value}'")))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: Option<String>,
    }

    #[test]
    fn test_parse_response_accepts_fenced_json() {
        let named: Named = parse_response("```json\n{\"name\": \"x\"}\n```").unwrap();
        assert_eq!(named.name.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_response_rejects_prose() {
        let result: Result<Named, _> = parse_response("Sure! Here is the data you asked for.");
        assert!(matches!(result, Err(ExtractionError::Malformed(_))));
    }

    #[test]
    fn test_required_text_rejects_blank() {
        assert!(required_text(Some("   ".to_string()), "name").is_err());
        assert!(required_text(None, "name").is_err());
        assert_eq!(required_text(Some(" Ada ".to_string()), "name").unwrap(), "Ada");
    }

    #[test]
    fn test_text_list_keeps_duplicates_in_order() {
        let list = text_list(Some(vec![
            "PMP".to_string(),
            " ".to_string(),
            "CISSP".to_string(),
            "PMP".to_string(),
        ]))
        .unwrap();
        assert_eq!(list, vec!["PMP", "CISSP", "PMP"]);
    }

    #[test]
    fn test_id_rejects_non_uuid() {
        assert!(id("cand-1", "candidateId").is_err());
        let uuid = Uuid::new_v4();
        assert_eq!(id(&uuid.to_string(), "candidateId").unwrap(), uuid);
    }

    #[test]
    fn test_finite_rejects_nan() {
        assert!(finite(f64::NAN, "score").is_err());
        assert_eq!(finite(0.5, "loe").unwrap(), 0.5);
    }
}
