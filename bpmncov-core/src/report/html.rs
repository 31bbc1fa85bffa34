//! Styled-document (HTML) rendering
//!
//! A single self-contained page: summary cards, the node and orphan tables,
//! and the full report as embedded JSON. Filtering and the uncovered-only
//! toggle run client-side.

use super::{ReportView, RowView};

const TEMPLATE: &str = include_str!("templates/report.html");

/// Render a self-contained HTML report.
pub fn render(view: &ReportView) -> crate::Result<String> {
    let report_json = build_report_json(view)?;
    let summary_cards = build_summary_cards(view);
    let table_rows = build_table_rows(view);
    let orphan_rows = build_orphan_rows(view);

    Ok(fill_template(
        TEMPLATE,
        &[
            ("DOCUMENT", escape_html(&view.document.path)),
            ("SHA256", escape_html(&view.document.sha256)),
            ("GENERATED_AT", escape_html(&view.generated_at)),
            ("SUMMARY_CARDS", summary_cards),
            ("TABLE_ROWS", table_rows),
            ("ORPHAN_ROWS", orphan_rows),
            ("REPORT_JSON", report_json),
        ],
    ))
}

/// Substitute `{{KEY}}` placeholders in a single pass, so substituted
/// values are never themselves scanned for placeholders.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let replaced = after.find("}}").and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, end))
        });
        match replaced {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn build_summary_cards(view: &ReportView) -> String {
    let s = &view.summary;
    let metrics = [
        ("Nodes", s.total.to_string()),
        ("Covered", s.covered.to_string()),
        ("Missing", s.missing.to_string()),
        ("Coverage", format!("{:.1}%", s.percent)),
        ("Orphans", s.orphans.to_string()),
    ];

    let mut cards = String::new();
    for (label, value) in metrics {
        cards.push_str(&format!(
            r#"<div class="metric-card"><span class="value">{}</span><span class="label">{}</span></div>"#,
            value, label
        ));
    }
    cards
}

fn build_table_rows(view: &ReportView) -> String {
    let mut rows = String::new();
    for row in &view.rows {
        rows.push_str(&format!(
            r#"<tr data-status="{status}"><td><code>{id}</code></td><td>{name}</td><td>{ty}</td><td>{priority}</td><td>{tags}</td><td>{jira}</td><td>{refs}</td><td>{figma}</td><td class="tests">{tests}</td><td class="status-{status}">{status}</td></tr>"#,
            status = row.coverage,
            id = escape_html(&row.id),
            name = escape_html(row.name.as_deref().unwrap_or("")),
            ty = escape_html(&row.node_type),
            priority = escape_html(row.priority.as_deref().unwrap_or("")),
            tags = escape_html(&row.tags.join(", ")),
            jira = escape_html(&row.jira.join(", ")),
            refs = escape_html(&row.playwright_refs.join(", ")),
            figma = figma_cell(row),
            tests = tests_cell(row),
        ));
        rows.push('\n');
    }
    rows
}

fn build_orphan_rows(view: &ReportView) -> String {
    let mut rows = String::new();
    for orphan in &view.orphans {
        rows.push_str(&format!(
            r#"<tr data-status="orphan"><td><code>{}</code></td><td>{}</td><td>{}</td><td class="title">{}</td></tr>"#,
            escape_html(&orphan.id),
            escape_html(&orphan.file),
            orphan.line,
            escape_html(orphan.title.as_deref().unwrap_or("")),
        ));
        rows.push('\n');
    }
    rows
}

fn figma_cell(row: &RowView) -> String {
    let Some(figma) = &row.figma else {
        return String::new();
    };
    match &figma.url {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_html(url),
            escape_html(figma.variant.as_deref().unwrap_or("design"))
        ),
        None => escape_html(figma.display()),
    }
}

fn tests_cell(row: &RowView) -> String {
    row.tests
        .iter()
        .map(|t| {
            let title = t
                .title
                .as_deref()
                .map(|title| format!(r#" <span class="title">{}</span>"#, escape_html(title)))
                .unwrap_or_default();
            format!("<div>{}:{}{}</div>", escape_html(&t.file), t.line, title)
        })
        .collect()
}

/// JSON safe to embed inside a `<script>` element
fn build_report_json(view: &ReportView) -> crate::Result<String> {
    let json = serde_json::to_string(view)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
