//! Delimited-text (CSV) rendering
//!
//! Every field is quoted, whether or not it needs to be, and embedded quotes
//! are doubled.

use super::{ReportView, RowView};
use crate::error::CoverageError;

pub const HEADER: [&str; 10] = [
    "BPMN ID",
    "Name",
    "Type",
    "Priority",
    "Tags",
    "Jira",
    "PlaywrightRefs",
    "Figma",
    "Tests",
    "Coverage",
];

/// Separator for list-valued cells
const LIST_SEPARATOR: &str = "|";

pub fn render(view: &ReportView) -> crate::Result<String> {
    let mut wtr = ::csv::WriterBuilder::new()
        .has_headers(true)
        .quote_style(::csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    wtr.write_record(HEADER)?;
    for row in &view.rows {
        wtr.write_record(record(row))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| CoverageError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn record(row: &RowView) -> [String; 10] {
    let tests = row
        .tests
        .iter()
        .map(|t| format!("{}:{}", t.file, t.line))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR);
    [
        row.id.clone(),
        row.name.clone().unwrap_or_default(),
        row.node_type.clone(),
        row.priority.clone().unwrap_or_default(),
        row.tags.join(LIST_SEPARATOR),
        row.jira.join(LIST_SEPARATOR),
        row.playwright_refs.join(LIST_SEPARATOR),
        row.figma
            .as_ref()
            .map(|f| f.display().to_string())
            .unwrap_or_default(),
        tests,
        row.coverage.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_view;

    #[test]
    fn test_csv_quotes_every_field() {
        let csv = render(&sample_view()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            r#""BPMN ID","Name","Type","Priority","Tags","Jira","PlaywrightRefs","Figma","Tests","Coverage""#
        );
        assert_eq!(
            lines[1],
            r#""Task_Login","Log ""in""","userTask","high","auth|smoke","SHOP-1|SHOP-2","tests/login.spec.ts","https://figma.com/file/abc","tests/login.spec.ts:3","covered""#
        );
        assert_eq!(
            lines[2],
            r#""Task_Pay","<Pay>","serviceTask","","","","","","","missing""#
        );
    }

    #[test]
    fn test_csv_has_no_orphan_rows() {
        let csv = render(&sample_view()).unwrap();
        assert!(!csv.contains("Task_Gone"));
    }
}
