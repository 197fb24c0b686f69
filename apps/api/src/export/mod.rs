//! Spreadsheet export: CSV rendering of the roster, requirements and staffing matrices.

pub mod csv;
pub mod matrices;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};

pub const ROSTER_PREFIX: &str = "Candidate_Matrix";
pub const REQUIREMENTS_PREFIX: &str = "Proposal_Matrix";
pub const STAFFING_PREFIX: &str = "Staffing_Matrix";

/// `<prefix>_YYYY-MM-DD.csv`
pub fn dated_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.csv", date.format("%Y-%m-%d"))
}

/// Serves `body` as a CSV attachment stamped with today's UTC date.
pub fn csv_attachment(prefix: &str, body: String) -> Response {
    let filename = dated_filename(prefix, Utc::now().date_naive());
    tracing::info!("Exporting {filename} ({} bytes)", body.len());
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_is_date_stamped() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            dated_filename(STAFFING_PREFIX, date),
            "Staffing_Matrix_2024-03-07.csv"
        );
        assert_eq!(
            dated_filename(ROSTER_PREFIX, date),
            "Candidate_Matrix_2024-03-07.csv"
        );
    }

    #[test]
    fn test_attachment_headers() {
        let response = csv_attachment(REQUIREMENTS_PREFIX, "A,B".to_string());
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=\"Proposal_Matrix_"));
        assert!(disposition.ends_with(".csv\""));
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
    }
}
