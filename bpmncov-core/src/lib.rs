//! bpmncov core - BPMN-to-test coverage reconciliation
//!
//! This library extracts identified nodes from a BPMN document, scans test
//! files for `[bpmn:<id>]` markers, and reconciles the two into a coverage
//! report with orphan detection.

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod scan;
pub mod tree;

pub use config::{Config, Project};
pub use error::CoverageError;
pub use extract::{ensure_unique_ids, extract_nodes, NodeFilter};
pub use model::{
    CoverageRow, CoverageStatus, ExtensionBag, FigmaLink, OrphanEntry, ProcessNode, ReferenceHit,
};
pub use pipeline::{build_report, run, write_outputs, Report, RunSummary};
pub use reconcile::{reconcile, Reconciliation, Summary};
pub use report::{OutputFormat, ReportView};
pub use scan::{scan_artifacts, walk_artifacts, MarkerScanner};
pub use tree::{parse_document, Element, Node};

/// Result type alias for coverage operations
pub type Result<T> = std::result::Result<T, CoverageError>;
