//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic editor actions. The host UI
//! feeds raw key events in and dispatches the resulting action through
//! the optimistic command factories; an action whose factory returns no
//! command is silently dropped.

/// Actions the keyboard can trigger on the builder canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Delete,
    Duplicate,
    Deselect,

    // Sibling order
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,
}

/// Resolves key events into actions.
///
/// Platform-aware: on macOS `meta` is ⌘, elsewhere `ctrl` plays that
/// role, so both count as the command modifier.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` follows `KeyboardEvent.key` (e.g. `"z"`, `"Delete"`).
    /// Returns `None` for unbound combos.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "[" => Some(ShortcutAction::SendToBack),
                "]" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
