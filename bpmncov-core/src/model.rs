//! Data model for extracted nodes, reference hits, and reconciled rows

/// Design-tool link fields attached to a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FigmaLink {
    pub url: Option<String>,
    pub node_id: Option<String>,
    pub component_key: Option<String>,
    pub variant: Option<String>,
}

impl FigmaLink {
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.node_id.is_none()
            && self.component_key.is_none()
            && self.variant.is_none()
    }
}

/// Metadata parsed from a node's `extensionElements`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionBag {
    /// External test references, in encounter order (not deduplicated)
    pub playwright_refs: Vec<String>,
    pub jira_keys: Vec<String>,
    pub tags: Vec<String>,
    pub priority: Option<String>,
    pub figma: FigmaLink,
}

impl ExtensionBag {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One typed, identified element of the process model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessNode {
    pub id: String,
    /// Tag name with any namespace prefix stripped (e.g. `userTask`)
    pub node_type: String,
    pub label: Option<String>,
    pub metadata: ExtensionBag,
}

/// One `[bpmn:<id>]` marker occurrence inside a test file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceHit {
    pub referenced_id: String,
    /// Path relative to the project root, `/`-separated
    pub source_file: String,
    /// 1-indexed
    pub source_line: usize,
    /// Best-effort test title containing the marker
    pub associated_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverageStatus {
    Covered,
    Missing,
}

impl CoverageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Covered => "covered",
            Self::Missing => "missing",
        }
    }

    pub fn from_hits(hits: &[ReferenceHit]) -> Self {
        if hits.is_empty() {
            Self::Missing
        } else {
            Self::Covered
        }
    }
}

/// Reconciled view of one process node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageRow {
    pub node: ProcessNode,
    pub hits: Vec<ReferenceHit>,
    pub status: CoverageStatus,
}

impl CoverageRow {
    pub fn new(node: ProcessNode, hits: Vec<ReferenceHit>) -> Self {
        let status = CoverageStatus::from_hits(&hits);
        Self { node, hits, status }
    }

    pub fn is_covered(&self) -> bool {
        self.status == CoverageStatus::Covered
    }
}

/// A hit whose identifier matches no extracted node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanEntry {
    pub hit: ReferenceHit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str) -> ReferenceHit {
        ReferenceHit {
            referenced_id: id.to_string(),
            source_file: "tests/a.spec.ts".to_string(),
            source_line: 1,
            associated_label: None,
        }
    }

    #[test]
    fn test_status_from_hits() {
        assert_eq!(CoverageStatus::from_hits(&[]), CoverageStatus::Missing);
        assert_eq!(
            CoverageStatus::from_hits(&[hit("A")]),
            CoverageStatus::Covered
        );
    }

    #[test]
    fn test_default_bag_is_empty() {
        let mut bag = ExtensionBag::default();
        assert!(bag.is_empty());
        bag.figma.variant = Some("dark".to_string());
        assert!(!bag.is_empty());
        assert!(!bag.figma.is_empty());
    }
}
