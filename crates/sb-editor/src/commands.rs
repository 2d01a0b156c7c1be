//! Invertible editing commands.
//!
//! Every mutation of the document goes through a `Command` so the history
//! can replay it in either direction. A command captures, at construction
//! time, everything needed to perform *and* invert itself without looking
//! at the live tree again: `Remove` keeps the detached subtree and its old
//! slot, `Move` keeps the original parent and index, `UpdateProps` keeps
//! the prior prop map.
//!
//! Factories are optimistic: drag/drop and keyboard layers call them
//! against whatever the tree looks like *now*, and a request that no
//! longer applies (stale id, illegal parent, no-op) yields `None` rather
//! than an error — the gesture just produces no visible change.

use crate::session::Session;
use sb_core::node::PropMap;
use sb_core::tree::TreeError;
use sb_core::{CanvasNode, ComponentTag, NodeId, ScreenId};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert a freshly minted node. Undo→redo reuses the same id.
    AddNode {
        parent: NodeId,
        index: usize,
        node: CanvasNode,
    },
    /// Detach a subtree; the capture is what undo reinserts.
    RemoveNode {
        parent: NodeId,
        index: usize,
        subtree: CanvasNode,
    },
    /// Reparent and/or reposition a subtree.
    MoveNode {
        id: NodeId,
        to_parent: NodeId,
        to_index: usize,
        from_parent: NodeId,
        from_index: usize,
    },
    /// Move within the current parent only.
    ReorderNode {
        id: NodeId,
        parent: NodeId,
        to_index: usize,
        from_index: usize,
    },
    /// Shallow-merge `patch` into a node's props; `snapshot` is the full
    /// prior map that undo restores wholesale.
    UpdateProps {
        id: NodeId,
        patch: PropMap,
        snapshot: PropMap,
    },
    /// Switch the current screen (or to none) and clear the selection.
    /// Touches no canvas node.
    SetScreen {
        to: Option<ScreenId>,
        from: Option<ScreenId>,
        prev_selection: Vec<NodeId>,
    },
    /// Insert a deep copy (fresh ids throughout) right after the source.
    DuplicateNode {
        source: NodeId,
        parent: NodeId,
        index: usize,
        copy: CanvasNode,
    },
}

impl Command {
    // ─── Factories ───────────────────────────────────────────────────────

    /// Add a new `tag` node under `parent` at `index`.
    /// `None` when `parent` is missing or not a container.
    pub fn add_node(
        session: &Session,
        parent: NodeId,
        tag: ComponentTag,
        index: usize,
        props: PropMap,
    ) -> Option<Self> {
        let parent_node = session.find_node(parent)?;
        if !session.catalog().is_container(parent_node.tag) {
            log::debug!("add_node: {parent} is not a container");
            return None;
        }
        Some(Self::AddNode {
            parent,
            index,
            node: CanvasNode::with_props(tag, props),
        })
    }

    /// Remove `id` and its subtree. `None` for the root or a stale id.
    pub fn remove_node(session: &Session, id: NodeId) -> Option<Self> {
        let tree = session.tree()?;
        let (parent, index) = tree.locate(id)?;
        let subtree = tree.find(id)?.clone();
        Some(Self::RemoveNode {
            parent,
            index,
            subtree,
        })
    }

    /// Move `id` under `new_parent` at `new_index` (pre-removal index
    /// semantics). `None` for stale ids, non-containers, cyclic moves,
    /// and moves that would land the node where it already is.
    pub fn move_node(
        session: &Session,
        id: NodeId,
        new_parent: NodeId,
        new_index: usize,
    ) -> Option<Self> {
        let tree = session.tree()?;
        let (from_parent, from_index) = tree.locate(id)?;
        if new_parent == id || tree.is_ancestor_of(id, new_parent) {
            log::debug!("move_node: {id} into {new_parent} would cycle");
            return None;
        }
        let dest = tree.find(new_parent)?;
        if !session.catalog().is_container(dest.tag) {
            log::debug!("move_node: {new_parent} is not a container");
            return None;
        }
        if from_parent == new_parent && resting_index(new_index, from_index, dest.children.len()) == from_index {
            return None;
        }
        Some(Self::MoveNode {
            id,
            to_parent: new_parent,
            to_index: new_index,
            from_parent,
            from_index,
        })
    }

    /// Reorder `id` among its siblings. `None` for stale ids and no-ops.
    pub fn reorder(session: &Session, id: NodeId, new_index: usize) -> Option<Self> {
        let tree = session.tree()?;
        let (parent, from_index) = tree.locate(id)?;
        let sibling_count = tree.find(parent)?.children.len();
        if resting_index(new_index, from_index, sibling_count) == from_index {
            return None;
        }
        Some(Self::ReorderNode {
            id,
            parent,
            to_index: new_index,
            from_index,
        })
    }

    /// Merge `patch` into the props of `id`. `None` for stale ids, empty
    /// patches, and patches that change nothing.
    pub fn update_props(session: &Session, id: NodeId, patch: PropMap) -> Option<Self> {
        if patch.is_empty() {
            return None;
        }
        let node = session.find_node(id)?;
        if node.merged_props(&patch) == node.props {
            return None;
        }
        Some(Self::UpdateProps {
            id,
            patch,
            snapshot: node.props.clone(),
        })
    }

    /// Switch the current screen. `None` when already current or when the
    /// target screen does not exist.
    pub fn set_screen(session: &Session, to: Option<ScreenId>) -> Option<Self> {
        if to == session.current_screen_id() {
            return None;
        }
        if let Some(id) = to
            && session.project.screen(id).is_none()
        {
            log::debug!("set_screen: unknown screen {id}");
            return None;
        }
        Some(Self::SetScreen {
            to,
            from: session.current_screen_id(),
            prev_selection: session.selection().to_vec(),
        })
    }

    /// Duplicate `id` next to itself. `None` for the root or a stale id.
    pub fn duplicate(session: &Session, id: NodeId) -> Option<Self> {
        let tree = session.tree()?;
        let (parent, index) = tree.locate(id)?;
        let copy = tree.find(id)?.duplicate();
        Some(Self::DuplicateNode {
            source: id,
            parent,
            index: index + 1,
            copy,
        })
    }

    // ─── Drop-position conveniences ──────────────────────────────────────

    /// Add a new `tag` node at the session's last resolved drop target.
    /// `None` when no target is currently resolved.
    pub fn add_at_drop(session: &Session, tag: ComponentTag) -> Option<Self> {
        let target = session.drop_target()?;
        Self::add_node(session, target.parent, tag, target.index, PropMap::new())
    }

    /// Move an existing node to the session's last resolved drop target.
    pub fn move_at_drop(session: &Session, id: NodeId) -> Option<Self> {
        let target = session.drop_target()?;
        Self::move_node(session, id, target.parent, target.index)
    }

    // ─── Z-order conveniences ────────────────────────────────────────────

    /// Swap with the next sibling (one step toward the front).
    pub fn bring_forward(session: &Session, id: NodeId) -> Option<Self> {
        let (_, index) = session.tree()?.locate(id)?;
        Self::reorder(session, id, index + 2)
    }

    /// Swap with the previous sibling (one step toward the back).
    pub fn send_backward(session: &Session, id: NodeId) -> Option<Self> {
        let (_, index) = session.tree()?.locate(id)?;
        Self::reorder(session, id, index.checked_sub(1)?)
    }

    /// Make `id` the last child of its parent.
    pub fn bring_to_front(session: &Session, id: NodeId) -> Option<Self> {
        let tree = session.tree()?;
        let (parent, _) = tree.locate(id)?;
        let len = tree.find(parent)?.children.len();
        Self::reorder(session, id, len)
    }

    /// Make `id` the first child of its parent.
    pub fn send_to_back(session: &Session, id: NodeId) -> Option<Self> {
        Self::reorder(session, id, 0)
    }

    // ─── Execution ───────────────────────────────────────────────────────

    /// Apply this command to the session. Validation happened in the
    /// factory; failures here mean the world changed since (it cannot,
    /// within one synchronous gesture) and leave the tree untouched.
    pub fn perform(&self, session: &mut Session) -> Result<(), TreeError> {
        match self {
            Self::AddNode {
                parent,
                index,
                node,
            } => session.insert_node(*parent, *index, node.clone()),
            Self::RemoveNode { subtree, .. } => session.remove_node(subtree.id).map(|_| ()),
            Self::MoveNode {
                id,
                to_parent,
                to_index,
                ..
            } => session.relocate_node(*id, *to_parent, *to_index),
            Self::ReorderNode { id, to_index, .. } => session.reorder_node(*id, *to_index),
            Self::UpdateProps { id, patch, .. } => session.merge_props(*id, patch),
            Self::SetScreen { to, .. } => {
                session.project.set_current(*to);
                session.clear_selection();
                Ok(())
            }
            Self::DuplicateNode {
                parent,
                index,
                copy,
                ..
            } => session.insert_node(*parent, *index, copy.clone()),
        }
    }

    /// Undo this command. For every legally constructed command,
    /// `invert ∘ perform` is the identity on the document (deep
    /// structural equality, child order and props included).
    pub fn invert(&self, session: &mut Session) -> Result<(), TreeError> {
        match self {
            Self::AddNode { node, .. } => session.remove_node(node.id).map(|_| ()),
            Self::RemoveNode {
                parent,
                index,
                subtree,
            } => session.insert_node(*parent, *index, subtree.clone()),
            // Restoration inserts into the list as it reads *after* the
            // detach (the captured index never counted the node itself),
            // so no same-parent shift applies — plain remove + insert.
            Self::MoveNode {
                id,
                from_parent,
                from_index,
                ..
            } => {
                let removed = session.remove_node(*id)?;
                session.insert_node(*from_parent, *from_index, removed.node)
            }
            Self::ReorderNode {
                id,
                parent,
                from_index,
                ..
            } => {
                let removed = session.remove_node(*id)?;
                session.insert_node(*parent, *from_index, removed.node)
            }
            Self::UpdateProps { id, snapshot, .. } => session.replace_props(*id, snapshot.clone()),
            Self::SetScreen {
                from,
                prev_selection,
                ..
            } => {
                session.project.set_current(*from);
                session.set_selection(prev_selection.clone());
                Ok(())
            }
            Self::DuplicateNode { copy, .. } => session.remove_node(copy.id).map(|_| ()),
        }
    }

    // ─── Diagnostics ─────────────────────────────────────────────────────

    /// Human-readable label for history panels and listener events.
    pub fn label(&self) -> String {
        match self {
            Self::AddNode { node, .. } => format!("Add {}", node.tag),
            Self::RemoveNode { subtree, .. } => format!("Remove {}", subtree.id),
            Self::MoveNode { id, .. } => format!("Move {id}"),
            Self::ReorderNode { id, .. } => format!("Reorder {id}"),
            Self::UpdateProps { id, .. } => format!("Edit {id} props"),
            Self::SetScreen { to: Some(id), .. } => format!("Switch to screen {id}"),
            Self::SetScreen { to: None, .. } => "Close screen".to_string(),
            Self::DuplicateNode { source, .. } => format!("Duplicate {source}"),
        }
    }

    /// Rough captured-payload size for the history's memory diagnostics.
    pub fn estimated_bytes(&self) -> usize {
        let base = std::mem::size_of::<Self>();
        base + match self {
            Self::AddNode { node, .. } => node.estimated_bytes(),
            Self::RemoveNode { subtree, .. } => subtree.estimated_bytes(),
            Self::DuplicateNode { copy, .. } => copy.estimated_bytes(),
            Self::UpdateProps {
                patch, snapshot, ..
            } => estimate_props(patch) + estimate_props(snapshot),
            Self::SetScreen { prev_selection, .. } => {
                prev_selection.len() * std::mem::size_of::<NodeId>()
            }
            Self::MoveNode { .. } | Self::ReorderNode { .. } => 0,
        }
    }
}

fn estimate_props(props: &PropMap) -> usize {
    props
        .iter()
        .map(|(k, v)| k.len() + v.to_string().len())
        .sum()
}

/// Where a node asked to sit at `requested` (pre-removal semantics) will
/// actually rest among `sibling_count` children it is already part of.
fn resting_index(requested: usize, from_index: usize, sibling_count: usize) -> usize {
    let clamped = requested.min(sibling_count);
    if from_index < clamped {
        clamped - 1
    } else {
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::{Project, Screen, StaticCatalog};
    use serde_json::json;

    fn tag(s: &str) -> ComponentTag {
        ComponentTag::intern(s)
    }

    /// Session with one screen: root → [ panel(container) → [ text ], button ]
    fn sample_session() -> (Session, NodeId, NodeId, NodeId) {
        let mut screen = Screen::new("Home");
        let mut panel = CanvasNode::new(tag("container"));
        let text = CanvasNode::new(tag("text"));
        let button = CanvasNode::new(tag("button"));
        let (panel_id, text_id, button_id) = (panel.id, text.id, button.id);
        panel.children.push(text);
        screen.content.children.push(panel);
        screen.content.children.push(button);

        let mut project = Project::new();
        project.add_screen(screen);
        let session = Session::with_project(project, StaticCatalog::standard());
        (session, panel_id, text_id, button_id)
    }

    #[test]
    fn add_into_leaf_yields_no_command() {
        let (session, _, text_id, _) = sample_session();
        assert!(Command::add_node(&session, text_id, tag("button"), 0, PropMap::new()).is_none());
    }

    #[test]
    fn add_perform_invert_roundtrip() {
        let (mut session, panel_id, _, _) = sample_session();
        let before = session.project.clone();

        let cmd = Command::add_node(&session, panel_id, tag("button"), 1, PropMap::new()).unwrap();
        cmd.perform(&mut session).unwrap();
        let added_id = match &cmd {
            Command::AddNode { node, .. } => node.id,
            _ => unreachable!(),
        };
        assert!(session.find_node(added_id).is_some());

        cmd.invert(&mut session).unwrap();
        assert_eq!(session.project, before);
    }

    #[test]
    fn remove_captures_enough_to_restore() {
        let (mut session, panel_id, text_id, _) = sample_session();
        let before = session.project.clone();

        let cmd = Command::remove_node(&session, panel_id).unwrap();
        cmd.perform(&mut session).unwrap();
        assert!(session.find_node(panel_id).is_none());
        assert!(session.find_node(text_id).is_none());

        cmd.invert(&mut session).unwrap();
        assert_eq!(session.project, before);
    }

    #[test]
    fn remove_root_yields_no_command() {
        let (session, ..) = sample_session();
        let root = session.tree().unwrap().id;
        assert!(Command::remove_node(&session, root).is_none());
    }

    #[test]
    fn cyclic_move_yields_no_command() {
        let (session, panel_id, text_id, _) = sample_session();
        assert!(Command::move_node(&session, panel_id, text_id, 0).is_none());
        assert!(Command::move_node(&session, panel_id, panel_id, 0).is_none());
    }

    #[test]
    fn noop_move_yields_no_command() {
        let (session, panel_id, _, _) = sample_session();
        let root = session.tree().unwrap().id;
        // panel sits at index 0 of root; both 0 and 1 rest it there.
        assert!(Command::move_node(&session, panel_id, root, 0).is_none());
        assert!(Command::move_node(&session, panel_id, root, 1).is_none());
        // index 2 actually moves it past the button.
        assert!(Command::move_node(&session, panel_id, root, 2).is_some());
    }

    #[test]
    fn move_invert_restores_order() {
        let (mut session, panel_id, _, button_id) = sample_session();
        let before = session.project.clone();

        let cmd = Command::move_node(&session, button_id, panel_id, 0).unwrap();
        cmd.perform(&mut session).unwrap();
        let tree = session.tree().unwrap();
        assert_eq!(tree.locate(button_id), Some((panel_id, 0)));

        cmd.invert(&mut session).unwrap();
        assert_eq!(session.project, before);
    }

    #[test]
    fn update_props_merges_and_restores() {
        let (mut session, _, text_id, _) = sample_session();
        let seed: PropMap = [("text".to_string(), json!("hi")), ("size".to_string(), json!(12))]
            .into_iter()
            .collect();
        session.replace_props(text_id, seed.clone()).unwrap();

        let patch: PropMap = [("text".to_string(), json!("bye"))].into_iter().collect();
        let cmd = Command::update_props(&session, text_id, patch).unwrap();
        cmd.perform(&mut session).unwrap();

        let node = session.find_node(text_id).unwrap();
        assert_eq!(node.props["text"], json!("bye"));
        assert_eq!(node.props["size"], json!(12), "unpatched key untouched");

        cmd.invert(&mut session).unwrap();
        assert_eq!(session.find_node(text_id).unwrap().props, seed);
    }

    #[test]
    fn update_props_noop_yields_no_command() {
        let (mut session, _, text_id, _) = sample_session();
        let seed: PropMap = [("text".to_string(), json!("hi"))].into_iter().collect();
        session.replace_props(text_id, seed.clone()).unwrap();

        assert!(Command::update_props(&session, text_id, PropMap::new()).is_none());
        assert!(Command::update_props(&session, text_id, seed).is_none());
    }

    #[test]
    fn set_screen_swaps_current_and_selection() {
        let (mut session, _, text_id, _) = sample_session();
        let settings = session.project.add_screen(Screen::new("Settings"));
        session.select(text_id);

        let cmd = Command::set_screen(&session, Some(settings)).unwrap();
        cmd.perform(&mut session).unwrap();
        assert_eq!(session.current_screen_id(), Some(settings));
        assert!(session.selection().is_empty());

        cmd.invert(&mut session).unwrap();
        assert_ne!(session.current_screen_id(), Some(settings));
        assert_eq!(session.selection(), &[text_id]);
    }

    #[test]
    fn set_screen_to_current_yields_no_command() {
        let (session, ..) = sample_session();
        let current = session.current_screen_id();
        assert!(Command::set_screen(&session, current).is_none());
    }

    #[test]
    fn duplicate_inserts_fresh_copy_after_source() {
        let (mut session, panel_id, text_id, _) = sample_session();
        let before = session.project.clone();

        let cmd = Command::duplicate(&session, panel_id).unwrap();
        cmd.perform(&mut session).unwrap();

        let tree = session.tree().unwrap();
        let copy = &tree.children[1];
        assert_eq!(copy.tag, tag("container"));
        assert_ne!(copy.id, panel_id);
        assert_eq!(copy.children.len(), 1);
        assert_ne!(copy.children[0].id, text_id);

        cmd.invert(&mut session).unwrap();
        assert_eq!(session.project, before);
    }

    #[test]
    fn z_order_factories() {
        let (mut session, panel_id, _, button_id) = sample_session();

        // panel is first: nothing behind it.
        assert!(Command::send_backward(&session, panel_id).is_none());
        assert!(Command::send_to_back(&session, panel_id).is_none());
        // button is last: nothing in front of it.
        assert!(Command::bring_forward(&session, button_id).is_none());
        assert!(Command::bring_to_front(&session, button_id).is_none());

        let cmd = Command::bring_forward(&session, panel_id).unwrap();
        cmd.perform(&mut session).unwrap();
        let tree = session.tree().unwrap();
        assert_eq!(tree.children[0].id, button_id);
        assert_eq!(tree.children[1].id, panel_id);
    }

    #[test]
    fn labels_read_like_actions() {
        let (session, panel_id, ..) = sample_session();
        let cmd = Command::remove_node(&session, panel_id).unwrap();
        assert!(cmd.label().starts_with("Remove "));
    }
}
