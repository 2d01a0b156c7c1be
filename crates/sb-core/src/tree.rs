//! Structural primitives over a canvas node tree.
//!
//! All operations run against a single root `CanvasNode` (the content of
//! the active screen). Every mutating primitive validates fully before
//! touching the tree, so a failed call leaves the document unchanged.

use crate::catalog::ComponentCatalog;
use crate::id::NodeId;
use crate::node::CanvasNode;
use smallvec::SmallVec;
use std::fmt;

/// Why a structural edit was rejected. The tree is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The referenced id does not resolve to a node in this tree
    /// (or the operation targeted the root where that is illegal).
    TargetNotFound(NodeId),
    /// The destination node's component type cannot hold children.
    NotAContainer(NodeId),
    /// The move would place a subtree inside itself.
    CyclicMove { node: NodeId, into: NodeId },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound(id) => write!(f, "node {id} not found in tree"),
            Self::NotAContainer(id) => write!(f, "node {id} cannot hold children"),
            Self::CyclicMove { node, into } => {
                write!(f, "moving {node} into {into} would create a cycle")
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// A detached subtree plus the context needed to put it back.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub node: CanvasNode,
    pub parent_id: NodeId,
    pub index: usize,
}

/// Path of node ids from the root down to a target, target included.
pub type NodePath = SmallVec<[NodeId; 8]>;

impl CanvasNode {
    /// Depth-first search for `id`. The uniqueness invariant means the
    /// first match is the only one.
    pub fn find(&self, id: NodeId) -> Option<&CanvasNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut CanvasNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Ids from this root down to `id`, inclusive. Empty when `id` is not
    /// in the tree. Drives breadcrumb and selection UI.
    pub fn path_to(&self, id: NodeId) -> NodePath {
        let mut path = NodePath::new();
        if !self.collect_path(id, &mut path) {
            path.clear();
        }
        path
    }

    fn collect_path(&self, id: NodeId, path: &mut NodePath) -> bool {
        path.push(self.id);
        if self.id == id {
            return true;
        }
        for child in &self.children {
            if child.collect_path(id, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// The owning context of `id`: its parent's id and its index among
    /// that parent's children. `None` for the root and for absent ids.
    pub fn locate(&self, id: NodeId) -> Option<(NodeId, usize)> {
        if let Some(index) = self.children.iter().position(|c| c.id == id) {
            return Some((self.id, index));
        }
        self.children.iter().find_map(|child| child.locate(id))
    }

    /// True when `ancestor` lies strictly above `descendant`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        if ancestor == descendant {
            return false;
        }
        let path = self.path_to(descendant);
        match path.split_last() {
            Some((_, ancestors)) => ancestors.contains(&ancestor),
            None => false,
        }
    }

    /// Number of nodes in the whole tree.
    pub fn node_count(&self) -> usize {
        self.subtree_len()
    }

    /// Attach `node` (and its whole subtree) under `parent_id`.
    /// `index` is clamped into `[0, children.len()]`.
    pub fn insert(
        &mut self,
        catalog: &dyn ComponentCatalog,
        parent_id: NodeId,
        index: usize,
        node: CanvasNode,
    ) -> Result<(), TreeError> {
        let parent = self
            .find_mut(parent_id)
            .ok_or(TreeError::TargetNotFound(parent_id))?;
        if !catalog.is_container(parent.tag) {
            return Err(TreeError::NotAContainer(parent_id));
        }
        let index = index.min(parent.children.len());
        parent.children.insert(index, node);
        Ok(())
    }

    /// Detach `id` and return the subtree with its former location.
    /// The root itself cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Result<Removed, TreeError> {
        if id == self.id {
            return Err(TreeError::TargetNotFound(id));
        }
        let (parent_id, index) = self.locate(id).ok_or(TreeError::TargetNotFound(id))?;
        let parent = self
            .find_mut(parent_id)
            .ok_or(TreeError::TargetNotFound(parent_id))?;
        let node = parent.children.remove(index);
        Ok(Removed {
            node,
            parent_id,
            index,
        })
    }

    /// Move `id` under `new_parent` at `new_index`.
    ///
    /// `new_index` addresses the child list as it reads *before* the node
    /// is detached; when the node already sits in `new_parent` ahead of
    /// that slot, the index is shifted down to compensate. A move into the
    /// node itself or any of its descendants is rejected before anything
    /// is touched.
    pub fn relocate(
        &mut self,
        catalog: &dyn ComponentCatalog,
        id: NodeId,
        new_parent: NodeId,
        new_index: usize,
    ) -> Result<(), TreeError> {
        if id == self.id || self.locate(id).is_none() {
            return Err(TreeError::TargetNotFound(id));
        }
        if new_parent == id || self.is_ancestor_of(id, new_parent) {
            log::trace!("rejecting cyclic move of {id} into {new_parent}");
            return Err(TreeError::CyclicMove {
                node: id,
                into: new_parent,
            });
        }
        let dest = self
            .find(new_parent)
            .ok_or(TreeError::TargetNotFound(new_parent))?;
        if !catalog.is_container(dest.tag) {
            return Err(TreeError::NotAContainer(new_parent));
        }

        let removed = self.remove(id)?;
        let mut index = new_index;
        if removed.parent_id == new_parent && removed.index < index {
            index -= 1;
        }
        self.insert(catalog, new_parent, index, removed.node)
    }

    /// Move `id` to `new_index` among its current siblings.
    /// Same pre-removal index semantics as [`relocate`](Self::relocate).
    pub fn reorder(&mut self, id: NodeId, new_index: usize) -> Result<(), TreeError> {
        let (parent_id, from) = self.locate(id).ok_or(TreeError::TargetNotFound(id))?;
        let parent = self
            .find_mut(parent_id)
            .ok_or(TreeError::TargetNotFound(parent_id))?;
        let node = parent.children.remove(from);
        let mut index = new_index;
        if from < index {
            index -= 1;
        }
        let index = index.min(parent.children.len());
        parent.children.insert(index, node);
        Ok(())
    }
}
