//! Process node extraction from the document tree

use crate::error::CoverageError;
use crate::model::{ExtensionBag, ProcessNode};
use crate::tree::{local_name, Element};
use std::collections::{HashSet, VecDeque};

/// Which id-bearing elements become process nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeFilter {
    /// Every element with an `id` attribute
    #[default]
    AnyWithId,
    /// Only elements whose local tag name is listed
    Types(Vec<String>),
}

impl NodeFilter {
    /// Build from configured type names; an empty list means no restriction
    pub fn from_types(types: &[String]) -> Self {
        if types.is_empty() {
            Self::AnyWithId
        } else {
            Self::Types(types.iter().map(|t| local_name(t).to_string()).collect())
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        if element.attr("id").is_none() {
            return false;
        }
        match self {
            Self::AnyWithId => true,
            Self::Types(types) => types.iter().any(|t| t == element.local_name()),
        }
    }
}

/// Recognized extension keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataKey {
    PlaywrightRef,
    JiraKeys,
    Tags,
    Priority,
    FigmaUrl,
    FigmaNodeId,
    FigmaComponentKey,
    Variant,
}

impl MetadataKey {
    fn parse(local: &str) -> Option<Self> {
        match local {
            "playwrightRef" => Some(Self::PlaywrightRef),
            "jiraKeys" => Some(Self::JiraKeys),
            "tags" => Some(Self::Tags),
            "priority" => Some(Self::Priority),
            "figmaUrl" => Some(Self::FigmaUrl),
            "figmaNodeId" => Some(Self::FigmaNodeId),
            "figmaComponentKey" => Some(Self::FigmaComponentKey),
            "variant" => Some(Self::Variant),
            _ => None,
        }
    }

    fn apply(self, bag: &mut ExtensionBag, text: &str) {
        match self {
            Self::PlaywrightRef => bag.playwright_refs.push(text.to_string()),
            Self::JiraKeys => bag.jira_keys.extend(split_list(text)),
            Self::Tags => bag.tags.extend(split_list(text)),
            Self::Priority => bag.priority = Some(text.to_string()),
            Self::FigmaUrl => bag.figma.url = Some(text.to_string()),
            Self::FigmaNodeId => bag.figma.node_id = Some(text.to_string()),
            Self::FigmaComponentKey => bag.figma.component_key = Some(text.to_string()),
            Self::Variant => bag.figma.variant = Some(text.to_string()),
        }
    }
}

/// Extract process nodes in document pre-order
pub fn extract_nodes(root: &Element, filter: &NodeFilter) -> Vec<ProcessNode> {
    let mut nodes = Vec::new();
    root.walk(&mut |element| {
        if !filter.matches(element) {
            return;
        }
        // matches() guarantees the id is present
        let Some(id) = element.attr("id") else {
            return;
        };
        nodes.push(ProcessNode {
            id: id.to_string(),
            node_type: element.local_name().to_string(),
            label: element
                .attr("name")
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from),
            metadata: extension_bag(element),
        });
    });
    tracing::debug!(count = nodes.len(), "extracted process nodes");
    nodes
}

/// Reject documents that reuse a node id
pub fn ensure_unique_ids(nodes: &[ProcessNode]) -> crate::Result<()> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(CoverageError::DuplicateNodeId {
                id: node.id.clone(),
            });
        }
    }
    Ok(())
}

/// Collect metadata from every `extensionElements` child of `element`.
///
/// Descendants are visited breadth-first. A recognized key is consumed
/// without descending into it; unknown elements are descended into so that
/// vendor wrappers (e.g. `<camunda:properties>`) do not hide keys.
fn extension_bag(element: &Element) -> ExtensionBag {
    let mut bag = ExtensionBag::default();
    for extensions in element.children_named("extensionElements") {
        let mut queue: VecDeque<&Element> = extensions.child_elements().collect();
        while let Some(child) = queue.pop_front() {
            match MetadataKey::parse(child.local_name()) {
                Some(key) => key.apply(&mut bag, child.text()),
                None => {
                    tracing::trace!(tag = %child.tag, "ignoring unrecognized extension element");
                    queue.extend(child.child_elements());
                }
            }
        }
    }
    bag
}

/// Split a `,` or `|` separated list into trimmed, non-empty items
fn split_list(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split([',', '|'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
}
