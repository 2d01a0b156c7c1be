//! SB editing engine: invertible commands over a canvas node tree,
//! bounded undo/redo, and drop-position resolution for drag gestures.
//!
//! A drag gesture flows through the engine like this: pointer-move frames
//! feed [`drop::resolve_drop`] (via [`session::Session::update_drop_target`]),
//! which only ever updates an ephemeral target; the terminal drop turns
//! that target into a [`commands::Command`] through an optimistic factory;
//! [`history::History::execute`] performs it and records it for undo. The
//! tree mutates nowhere else.

pub mod commands;
pub mod drop;
pub mod history;
pub mod session;
pub mod shortcuts;

pub use commands::Command;
pub use drop::{Bounds, DropCandidate, DropRelation, DropTarget, candidates_under_point, resolve_drop};
pub use history::{
    DEFAULT_MAX_ENTRIES, History, HistoryEvent, HistoryEventKind, ListenerId, MemoryInfo,
};
pub use session::Session;
pub use shortcuts::{ShortcutAction, ShortcutMap};
