//! Screens and the project that owns them.
//!
//! A project is an ordered list of screens, each the root of one document
//! tree. At most one screen is "current" from the editor's perspective.
//! Screen CRUD here is plain bookkeeping — only *switching* the current
//! screen participates in undo history, over in `sb-editor`.

use crate::id::{ComponentTag, NodeId, ScreenId};
use crate::node::CanvasNode;
use serde::{Deserialize, Serialize};

/// Component tag given to every screen's root node.
pub const SCREEN_ROOT_TAG: &str = "screen";

/// One screen: a named document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub id: ScreenId,
    pub name: String,
    /// Root of this screen's node tree. Never removable.
    pub content: CanvasNode,
}

impl Screen {
    /// Create an empty screen with a fresh id and a container root.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ScreenId::fresh(),
            name: name.into(),
            content: CanvasNode::new(ComponentTag::intern(SCREEN_ROOT_TAG)),
        }
    }

    /// Id of this screen's root node.
    pub fn root_id(&self) -> NodeId {
        self.content.id
    }
}

/// The whole editable document: ordered screens, one optionally current.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub screens: Vec<Screen>,
    current: Option<ScreenId>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a screen; the first screen added becomes current.
    pub fn add_screen(&mut self, screen: Screen) -> ScreenId {
        let id = screen.id;
        self.screens.push(screen);
        if self.current.is_none() {
            self.current = Some(id);
        }
        id
    }

    /// Remove a screen by id, returning it. Clears `current` if it pointed
    /// at the removed screen.
    pub fn remove_screen(&mut self, id: ScreenId) -> Option<Screen> {
        let index = self.screens.iter().position(|s| s.id == id)?;
        if self.current == Some(id) {
            self.current = None;
        }
        Some(self.screens.remove(index))
    }

    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == id)
    }

    pub fn screen_mut(&mut self, id: ScreenId) -> Option<&mut Screen> {
        self.screens.iter_mut().find(|s| s.id == id)
    }

    pub fn current_id(&self) -> Option<ScreenId> {
        self.current
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        self.current.and_then(|id| self.screen(id))
    }

    pub fn current_screen_mut(&mut self) -> Option<&mut Screen> {
        let id = self.current?;
        self.screen_mut(id)
    }

    /// Point `current` at `id` (or nothing). Ids not present in the
    /// project are accepted and simply resolve to no screen, mirroring the
    /// tolerance for stale references elsewhere.
    pub fn set_current(&mut self, id: Option<ScreenId>) {
        self.current = id.filter(|id| self.screen(*id).is_some());
    }
}
