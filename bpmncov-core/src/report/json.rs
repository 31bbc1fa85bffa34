//! Structured-data (JSON) rendering

use super::ReportView;

/// Pretty-printed JSON with a trailing newline
pub fn render(view: &ReportView) -> crate::Result<String> {
    let mut out = serde_json::to_string_pretty(view)?;
    out.push('\n');
    Ok(out)
}
