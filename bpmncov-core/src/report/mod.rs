//! Report views and output formats
//!
//! [`ReportView`] is the single serializable shape every format renders
//! from, so the JSON, CSV and HTML outputs cannot disagree on coverage.

pub mod csv;
pub mod html;
pub mod json;

use crate::config::OutputConfig;
use crate::model::{CoverageRow, FigmaLink, OrphanEntry, ReferenceHit};
use crate::reconcile::{Reconciliation, Summary};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Csv,
    Html,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Json, Self::Csv, Self::Html];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }

    /// Configured file name for this format
    pub fn file_name(self, output: &OutputConfig) -> &str {
        match self {
            Self::Json => &output.json,
            Self::Csv => &output.csv,
            Self::Html => &output.html,
        }
    }

    pub fn render(self, view: &ReportView) -> crate::Result<String> {
        match self {
            Self::Json => json::render(view),
            Self::Csv => csv::render(view),
            Self::Html => html::render(view),
        }
    }
}

/// Identity of the BPMN document a report was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    /// Path relative to the project root
    pub path: String,
    /// Hex-encoded SHA-256 of the document bytes
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub generated_at: String,
    pub document: DocumentInfo,
    pub summary: Summary,
    pub rows: Vec<RowView>,
    pub orphans: Vec<OrphanView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    pub priority: Option<String>,
    pub tags: Vec<String>,
    pub jira: Vec<String>,
    pub playwright_refs: Vec<String>,
    pub figma: Option<FigmaView>,
    pub tests: Vec<TestRefView>,
    pub coverage: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaView {
    pub url: Option<String>,
    pub node_id: Option<String>,
    pub component_key: Option<String>,
    pub variant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRefView {
    pub file: String,
    pub line: usize,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanView {
    pub id: String,
    pub file: String,
    pub line: usize,
    pub title: Option<String>,
}

impl ReportView {
    pub fn new(
        reconciliation: &Reconciliation,
        document: DocumentInfo,
        generated_at: impl Into<String>,
    ) -> Self {
        Self {
            generated_at: generated_at.into(),
            document,
            summary: reconciliation.summary(),
            rows: reconciliation.rows.iter().map(RowView::from).collect(),
            orphans: reconciliation.orphans.iter().map(OrphanView::from).collect(),
        }
    }
}

impl From<&CoverageRow> for RowView {
    fn from(row: &CoverageRow) -> Self {
        let node = &row.node;
        let meta = &node.metadata;
        Self {
            id: node.id.clone(),
            name: node.label.clone(),
            node_type: node.node_type.clone(),
            priority: meta.priority.clone(),
            tags: meta.tags.clone(),
            jira: meta.jira_keys.clone(),
            playwright_refs: meta.playwright_refs.clone(),
            figma: FigmaView::from_link(&meta.figma),
            tests: row.hits.iter().map(TestRefView::from).collect(),
            coverage: row.status.as_str(),
        }
    }
}

impl FigmaView {
    fn from_link(link: &FigmaLink) -> Option<Self> {
        if link.is_empty() {
            return None;
        }
        Some(Self {
            url: link.url.clone(),
            node_id: link.node_id.clone(),
            component_key: link.component_key.clone(),
            variant: link.variant.clone(),
        })
    }

    /// Single display value: the URL, else the node id
    pub fn display(&self) -> &str {
        self.url
            .as_deref()
            .or(self.node_id.as_deref())
            .unwrap_or("")
    }
}

impl From<&ReferenceHit> for TestRefView {
    fn from(hit: &ReferenceHit) -> Self {
        Self {
            file: hit.source_file.clone(),
            line: hit.source_line,
            title: hit.associated_label.clone(),
        }
    }
}

impl From<&OrphanEntry> for OrphanView {
    fn from(orphan: &OrphanEntry) -> Self {
        Self {
            id: orphan.hit.referenced_id.clone(),
            file: orphan.hit.source_file.clone(),
            line: orphan.hit.source_line,
            title: orphan.hit.associated_label.clone(),
        }
    }
}

/// Current time as an RFC 3339 UTC timestamp
pub fn timestamp_utc() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
