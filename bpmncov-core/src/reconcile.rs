//! Reconciliation of process nodes against marker hits

use crate::model::{CoverageRow, OrphanEntry, ProcessNode, ReferenceHit};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// Coverage rows (one per node, document order) and orphaned hits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub rows: Vec<CoverageRow>,
    pub orphans: Vec<OrphanEntry>,
}

/// Headline counts for a reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub covered: usize,
    pub missing: usize,
    pub orphans: usize,
    /// Covered share of rows, one decimal place; 0 when there are no rows
    pub percent: f64,
}

/// Join nodes and hits by exact identifier equality.
///
/// Hits are grouped by id in first-appearance order. Each node takes its
/// group (possibly empty); groups whose id names no node become orphans, one
/// entry per hit, in group order then hit order.
pub fn reconcile(nodes: &[ProcessNode], hits: &[ReferenceHit]) -> Reconciliation {
    let mut groups: IndexMap<&str, Vec<&ReferenceHit>> = IndexMap::new();
    for hit in hits {
        groups.entry(hit.referenced_id.as_str()).or_default().push(hit);
    }

    let rows: Vec<CoverageRow> = nodes
        .iter()
        .map(|node| {
            let matched = groups
                .get(node.id.as_str())
                .map(|group| group.iter().map(|&h| h.clone()).collect())
                .unwrap_or_default();
            CoverageRow::new(node.clone(), matched)
        })
        .collect();

    let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let orphans: Vec<OrphanEntry> = groups
        .iter()
        .filter(|(id, _)| !node_ids.contains(*id))
        .flat_map(|(_, group)| group.iter().map(|&h| OrphanEntry { hit: h.clone() }))
        .collect();

    if !orphans.is_empty() {
        tracing::warn!(count = orphans.len(), "found references to unknown BPMN ids");
    }

    Reconciliation { rows, orphans }
}

impl Reconciliation {
    pub fn summary(&self) -> Summary {
        let total = self.rows.len();
        let covered = self.rows.iter().filter(|r| r.is_covered()).count();
        let percent = if total == 0 {
            0.0
        } else {
            (covered as f64 * 1000.0 / total as f64).round() / 10.0
        };
        Summary {
            total,
            covered,
            missing: total - covered,
            orphans: self.orphans.len(),
            percent,
        }
    }
}
