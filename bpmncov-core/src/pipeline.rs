//! End-to-end run: load, extract, scan, reconcile, render, write.

use crate::config::Project;
use crate::error::CoverageError;
use crate::extract::{ensure_unique_ids, extract_nodes, NodeFilter};
use crate::reconcile::{reconcile, Reconciliation, Summary};
use crate::report::{timestamp_utc, DocumentInfo, OutputFormat, ReportView};
use crate::scan::{scan_artifacts, walk_artifacts};
use crate::tree::parse_document;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// Reconciled result plus the identity of its source document
#[derive(Debug, Clone)]
pub struct Report {
    pub document: DocumentInfo,
    pub reconciliation: Reconciliation,
    /// Number of test files scanned
    pub files_scanned: usize,
}

impl Report {
    /// View stamped with the current time
    pub fn view(&self) -> ReportView {
        self.view_at(timestamp_utc())
    }

    /// View stamped with an explicit time, for reproducible output
    pub fn view_at(&self, generated_at: impl Into<String>) -> ReportView {
        ReportView::new(&self.reconciliation, self.document.clone(), generated_at)
    }
}

/// Outcome of a full run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub summary: Summary,
    pub files_scanned: usize,
    pub outputs: Vec<PathBuf>,
}

/// Build the reconciled report without writing anything.
pub fn build_report(project: &Project) -> crate::Result<Report> {
    let document_path = project.document_path();
    if !document_path.is_file() {
        return Err(CoverageError::InputMissing(document_path));
    }

    let bytes = fs::read(&document_path)?;
    let sha256 = hex::encode(Sha256::digest(&bytes));

    let tree = parse_document(&bytes, &document_path)?;
    let filter = NodeFilter::from_types(&project.config.document.node_types);
    let nodes = extract_nodes(&tree, &filter);
    ensure_unique_ids(&nodes)?;
    tracing::info!(nodes = nodes.len(), path = %document_path.display(), "loaded BPMN document");

    let files = walk_artifacts(project)?;
    let hits = scan_artifacts(project, &files)?;
    tracing::info!(files = files.len(), hits = hits.len(), "scanned test files");

    let reconciliation = reconcile(&nodes, &hits);

    Ok(Report {
        document: DocumentInfo {
            path: project
                .config
                .document
                .path
                .to_string_lossy()
                .replace('\\', "/"),
            sha256,
        },
        reconciliation,
        files_scanned: files.len(),
    })
}

/// Render every output format, then write them to the output directory.
///
/// All rendering happens before the first write, so a render failure leaves
/// no files behind.
pub fn write_outputs(project: &Project, view: &ReportView) -> crate::Result<Vec<PathBuf>> {
    let mut rendered = Vec::with_capacity(OutputFormat::ALL.len());
    for format in OutputFormat::ALL {
        rendered.push((format, format.render(view)?));
    }

    let out_dir = project.output_dir();
    fs::create_dir_all(&out_dir)?;

    let mut written = Vec::with_capacity(rendered.len());
    for (format, content) in rendered {
        let path = out_dir.join(format.file_name(&project.config.output));
        fs::write(&path, content)?;
        tracing::debug!(format = format.as_str(), path = %path.display(), "wrote report");
        written.push(path);
    }
    Ok(written)
}

/// Run the whole pipeline for a project.
pub fn run(project: &Project) -> crate::Result<RunSummary> {
    let report = build_report(project)?;
    let view = report.view();
    let outputs = write_outputs(project, &view)?;

    Ok(RunSummary {
        summary: view.summary,
        files_scanned: report.files_scanned,
        outputs,
    })
}
