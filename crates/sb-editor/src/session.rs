//! One editing session: the project being edited, the node selection, the
//! component catalog, and the ephemeral drop target of an in-flight drag.
//!
//! Everything is an explicitly constructed value passed by reference — no
//! process-wide editor state. One `Session` plus one `History` make an
//! independent editing scope; tests and multi-document hosts can hold as
//! many as they like.

use crate::drop::{DropCandidate, DropTarget, resolve_drop};
use sb_core::node::PropMap;
use sb_core::tree::{NodePath, Removed, TreeError};
use sb_core::{CanvasNode, ComponentCatalog, NodeId, Project, Screen, ScreenId};

pub struct Session {
    pub project: Project,
    catalog: Box<dyn ComponentCatalog>,
    selection: Vec<NodeId>,
    drop_target: Option<DropTarget>,
}

impl Session {
    /// Empty session: no screens, nothing selected.
    pub fn new(catalog: impl ComponentCatalog + 'static) -> Self {
        Self::with_project(Project::new(), catalog)
    }

    pub fn with_project(project: Project, catalog: impl ComponentCatalog + 'static) -> Self {
        Self {
            project,
            catalog: Box::new(catalog),
            selection: Vec::new(),
            drop_target: None,
        }
    }

    pub fn catalog(&self) -> &dyn ComponentCatalog {
        &*self.catalog
    }

    // ─── Query surface ───────────────────────────────────────────────────

    pub fn current_screen(&self) -> Option<&Screen> {
        self.project.current_screen()
    }

    pub fn current_screen_id(&self) -> Option<ScreenId> {
        self.project.current_id()
    }

    /// Root of the current screen's tree.
    pub fn tree(&self) -> Option<&CanvasNode> {
        self.current_screen().map(|s| &s.content)
    }

    /// Results are snapshots: valid until the next mutating call.
    pub fn find_node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.tree()?.find(id)
    }

    /// Breadcrumb path from the screen root to `id`; empty when absent.
    pub fn node_path(&self, id: NodeId) -> NodePath {
        self.tree().map(|t| t.path_to(id)).unwrap_or_default()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Replace the selection with a single node.
    pub fn select(&mut self, id: NodeId) {
        self.selection = vec![id];
    }

    /// Shift-click semantics: toggle a node in or out of the selection.
    pub fn toggle_selected(&mut self, id: NodeId) {
        if let Some(pos) = self.selection.iter().position(|s| *s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_selection(&mut self, ids: Vec<NodeId>) {
        self.selection = ids;
    }

    /// Drop selected ids that no longer resolve in the current tree.
    pub fn prune_selection(&mut self) {
        let tree = self.project.current_screen().map(|s| &s.content);
        self.selection
            .retain(|id| tree.is_some_and(|t| t.contains(*id)));
    }

    // ─── Drag state ──────────────────────────────────────────────────────

    /// Recompute the drop target for a pointer-move frame. Touches nothing
    /// but this ephemeral field; the tree only mutates on the terminal
    /// drop, through a command.
    pub fn update_drop_target(
        &mut self,
        px: f32,
        py: f32,
        candidates: &[DropCandidate],
    ) -> Option<DropTarget> {
        self.drop_target = resolve_drop(px, py, candidates);
        self.drop_target
    }

    /// The last resolved target, if the pointer is over a valid one.
    pub fn drop_target(&self) -> Option<DropTarget> {
        self.drop_target
    }

    /// Cancelled or completed gesture: forget the ephemeral target.
    /// Nothing was committed, so there is nothing to roll back.
    pub fn clear_drop_target(&mut self) {
        self.drop_target = None;
    }

    // ─── Tree-op wrappers (used by commands) ─────────────────────────────
    //
    // These resolve the current screen and thread the catalog through.
    // With no current screen every target is, by definition, not found.

    pub fn insert_node(
        &mut self,
        parent: NodeId,
        index: usize,
        node: CanvasNode,
    ) -> Result<(), TreeError> {
        let catalog = &*self.catalog;
        let screen = self
            .project
            .current_screen_mut()
            .ok_or(TreeError::TargetNotFound(parent))?;
        screen.content.insert(catalog, parent, index, node)
    }

    pub fn remove_node(&mut self, id: NodeId) -> Result<Removed, TreeError> {
        let screen = self
            .project
            .current_screen_mut()
            .ok_or(TreeError::TargetNotFound(id))?;
        let removed = screen.content.remove(id)?;
        self.prune_selection();
        Ok(removed)
    }

    pub fn relocate_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        new_index: usize,
    ) -> Result<(), TreeError> {
        let catalog = &*self.catalog;
        let screen = self
            .project
            .current_screen_mut()
            .ok_or(TreeError::TargetNotFound(id))?;
        screen.content.relocate(catalog, id, new_parent, new_index)
    }

    pub fn reorder_node(&mut self, id: NodeId, new_index: usize) -> Result<(), TreeError> {
        let screen = self
            .project
            .current_screen_mut()
            .ok_or(TreeError::TargetNotFound(id))?;
        screen.content.reorder(id, new_index)
    }

    pub fn merge_props(&mut self, id: NodeId, patch: &PropMap) -> Result<(), TreeError> {
        let screen = self
            .project
            .current_screen_mut()
            .ok_or(TreeError::TargetNotFound(id))?;
        let node = screen
            .content
            .find_mut(id)
            .ok_or(TreeError::TargetNotFound(id))?;
        node.merge_props(patch);
        Ok(())
    }

    pub fn replace_props(&mut self, id: NodeId, props: PropMap) -> Result<(), TreeError> {
        let screen = self
            .project
            .current_screen_mut()
            .ok_or(TreeError::TargetNotFound(id))?;
        let node = screen
            .content
            .find_mut(id)
            .ok_or(TreeError::TargetNotFound(id))?;
        node.props = props;
        Ok(())
    }
}
