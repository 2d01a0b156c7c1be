//! Canvas node data model.
//!
//! A document is a strict ownership tree: every `CanvasNode` owns its
//! children exclusively, so detaching a node hands the caller the whole
//! subtree as a value. There are no parent back-pointers — owning context
//! is recovered by traversal (see `tree`).

use crate::id::{ComponentTag, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Untyped properties attached to a node. Values are opaque to the core —
/// component-specific schemas are the palette's business, not ours.
/// Ordered map so serialized output and comparisons are deterministic.
pub type PropMap = BTreeMap<String, Value>;

/// One element of the edited UI hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    /// Unique, immutable id minted when the node is created.
    pub id: NodeId,

    /// Component type from the palette (`text`, `button`, `container`, …).
    pub tag: ComponentTag,

    /// Component properties. Never schema-validated here.
    pub props: PropMap,

    /// Ordered children. Empty for leaf tags; the insert/move guards
    /// keep it that way.
    pub children: Vec<CanvasNode>,
}

impl CanvasNode {
    /// Create a node with a freshly minted unique id and no props.
    pub fn new(tag: ComponentTag) -> Self {
        Self::with_props(tag, PropMap::new())
    }

    /// Create a node with a freshly minted unique id and the given props.
    pub fn with_props(tag: ComponentTag, props: PropMap) -> Self {
        Self {
            id: NodeId::fresh(tag.as_str()),
            tag,
            props,
            children: Vec::new(),
        }
    }

    /// Shallow-merge `patch` into this node's props: keys present in
    /// `patch` overwrite, all other keys are untouched.
    pub fn merge_props(&mut self, patch: &PropMap) {
        for (key, value) in patch {
            self.props.insert(key.clone(), value.clone());
        }
    }

    /// What `props` would look like after `merge_props(patch)`, without
    /// mutating. Used for no-op detection before a command is built.
    pub fn merged_props(&self, patch: &PropMap) -> PropMap {
        let mut merged = self.props.clone();
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Deep copy of this subtree with fresh ids at every level.
    /// Tags, props, and child order are preserved; ids are not.
    pub fn duplicate(&self) -> Self {
        Self {
            id: NodeId::fresh(self.tag.as_str()),
            tag: self.tag,
            props: self.props.clone(),
            children: self.children.iter().map(Self::duplicate).collect(),
        }
    }

    /// Number of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }

    /// Rough payload size of this subtree in bytes. A heuristic for
    /// history diagnostics, not an allocator measurement.
    pub fn estimated_bytes(&self) -> usize {
        let own = std::mem::size_of::<Self>()
            + self
                .props
                .iter()
                .map(|(k, v)| k.len() + estimate_value(v))
                .sum::<usize>();
        own + self
            .children
            .iter()
            .map(Self::estimated_bytes)
            .sum::<usize>()
    }
}

fn estimate_value(v: &Value) -> usize {
    match v {
        Value::Null | Value::Bool(_) | Value::Number(_) => 8,
        Value::String(s) => s.len(),
        Value::Array(items) => items.iter().map(estimate_value).sum(),
        Value::Object(map) => map.iter().map(|(k, v)| k.len() + estimate_value(v)).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(pairs: &[(&str, Value)]) -> PropMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn merge_overwrites_only_patched_keys() {
        let mut node = CanvasNode::with_props(
            ComponentTag::intern("text"),
            props(&[("text", json!("hello")), ("size", json!(14))]),
        );
        node.merge_props(&props(&[("text", json!("world"))]));

        assert_eq!(node.props["text"], json!("world"));
        assert_eq!(node.props["size"], json!(14));
    }

    #[test]
    fn merged_props_does_not_mutate() {
        let node = CanvasNode::with_props(
            ComponentTag::intern("button"),
            props(&[("label", json!("Go"))]),
        );
        let merged = node.merged_props(&props(&[("label", json!("Stop"))]));
        assert_eq!(merged["label"], json!("Stop"));
        assert_eq!(node.props["label"], json!("Go"));
    }

    #[test]
    fn duplicate_refreshes_every_id() {
        let mut row = CanvasNode::new(ComponentTag::intern("row"));
        row.children.push(CanvasNode::new(ComponentTag::intern("text")));
        row.children.push(CanvasNode::new(ComponentTag::intern("button")));

        let copy = row.duplicate();
        assert_ne!(copy.id, row.id);
        assert_eq!(copy.tag, row.tag);
        assert_eq!(copy.children.len(), 2);
        assert_ne!(copy.children[0].id, row.children[0].id);
        assert_ne!(copy.children[1].id, row.children[1].id);
        assert_eq!(copy.children[0].tag, row.children[0].tag);
    }

    #[test]
    fn subtree_len_counts_self_and_descendants() {
        let mut root = CanvasNode::new(ComponentTag::intern("container"));
        let mut row = CanvasNode::new(ComponentTag::intern("row"));
        row.children.push(CanvasNode::new(ComponentTag::intern("text")));
        root.children.push(row);

        assert_eq!(root.subtree_len(), 3);
    }
}
