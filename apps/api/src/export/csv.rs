//! Minimal CSV writer for the three matrix exports.
//!
//! Header cells are written bare; every data cell is wrapped in double quotes with
//! internal quotes doubled, so commas and newlines inside values survive.

/// One data cell. `Empty` renders as `""`.
#[derive(Debug, Clone, PartialEq)]
pub enum CsvCell {
    Text(String),
    Number(f64),
    Empty,
}

impl CsvCell {
    fn render(&self) -> String {
        let raw = match self {
            CsvCell::Text(s) => s.clone(),
            // f64 Display gives the shortest form: 1.0 -> "1", 0.5 -> "0.5"
            CsvCell::Number(n) => n.to_string(),
            CsvCell::Empty => String::new(),
        };
        format!("\"{}\"", raw.replace('"', "\"\""))
    }
}

impl From<&str> for CsvCell {
    fn from(value: &str) -> Self {
        CsvCell::Text(value.to_string())
    }
}

impl From<String> for CsvCell {
    fn from(value: String) -> Self {
        CsvCell::Text(value)
    }
}

impl From<f64> for CsvCell {
    fn from(value: f64) -> Self {
        CsvCell::Number(value)
    }
}

impl<T: Into<CsvCell>> From<Option<T>> for CsvCell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CsvCell::Empty)
    }
}

pub fn write_csv(headers: &[&str], rows: &[Vec<CsvCell>]) -> String {
    std::iter::once(headers.join(","))
        .chain(rows.iter().map(|row| {
            row.iter()
                .map(CsvCell::render)
                .collect::<Vec<_>>()
                .join(",")
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row_is_bare_and_cells_are_quoted() {
        let out = write_csv(
            &["Name", "LOE (FTE)"],
            &[vec!["Ada".into(), CsvCell::Number(0.5)]],
        );
        assert_eq!(out, "Name,LOE (FTE)\n\"Ada\",\"0.5\"");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let out = write_csv(&["Summary"], &[vec!["Built the \"Analytical\" engine, v2".into()]]);
        assert_eq!(out, "Summary\n\"Built the \"\"Analytical\"\" engine, v2\"");
    }

    #[test]
    fn test_empty_and_missing_cells_render_as_empty_quotes() {
        let missing: Option<&str> = None;
        let out = write_csv(&["A", "B"], &[vec![CsvCell::Empty, missing.into()]]);
        assert_eq!(out, "A,B\n\"\",\"\"");
    }

    #[test]
    fn test_whole_numbers_have_no_fraction() {
        assert_eq!(CsvCell::Number(1.0).render(), "\"1\"");
        assert_eq!(CsvCell::Number(85.0).render(), "\"85\"");
    }

    #[test]
    fn test_headers_only_when_no_rows() {
        assert_eq!(write_csv(&["A", "B"], &[]), "A,B");
    }

    #[test]
    fn test_header_round_trip() {
        let headers = ["Proposal Name", "Position Title", "Required LCAT"];
        let out = write_csv(&headers, &[]);
        let parsed: Vec<&str> = out.lines().next().unwrap().split(',').collect();
        assert_eq!(parsed, headers);
    }
}
