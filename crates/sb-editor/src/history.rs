//! Bounded, linear undo/redo history.
//!
//! Two stacks of commands, most recent last. Executing anything new
//! clears redo — the timeline never branches. The undo stack is capped:
//! past `max_entries` the oldest command is evicted FIFO and its state is
//! unrecoverable by construction (reaching it would require an undo that
//! no longer exists).
//!
//! Execution is synchronous and non-reentrant: every method takes the
//! session by `&mut`, and listeners only ever see a shared event, so a
//! listener cannot re-enter the history mid-mutation.

use crate::commands::Command;
use crate::session::Session;
use sb_core::tree::TreeError;
use std::collections::BTreeMap;

/// Default undo depth for sessions that don't specify one.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// What just happened, delivered to listeners after the stacks settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEvent {
    pub kind: HistoryEventKind,
    /// Label of the command involved; empty for `Cleared`.
    pub label: String,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEventKind {
    Executed,
    Undone,
    Redone,
    Cleared,
}

/// Handle returned by [`History::on_change`]; pass to
/// [`History::off_change`] to unsubscribe.
pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&HistoryEvent)>;

/// Stack sizes and captured-payload estimate, for diagnostics panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub max_entries: usize,
    pub estimated_bytes: usize,
}

pub struct History {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    max_entries: usize,
    next_listener_id: ListenerId,
    listeners: BTreeMap<ListenerId, Listener>,
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_entries.min(DEFAULT_MAX_ENTRIES)),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
            next_listener_id: 1,
            listeners: BTreeMap::new(),
        }
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Perform `command` and record it. On failure nothing is recorded and
    /// the tree is unchanged (commands validate before they touch it).
    pub fn execute(&mut self, session: &mut Session, command: Command) -> Result<(), TreeError> {
        if let Err(err) = command.perform(session) {
            log::warn!("execute {} failed: {err}", command.label());
            return Err(err);
        }
        log::debug!("execute {}", command.label());

        let label = command.label();
        self.undo_stack.push(command);
        if self.undo_stack.len() > self.max_entries {
            let evicted = self.undo_stack.remove(0);
            log::debug!("history full, evicting {}", evicted.label());
        }
        self.redo_stack.clear();
        self.notify(HistoryEventKind::Executed, label);
        Ok(())
    }

    /// Undo the most recent command. `None` when there is nothing to undo.
    pub fn undo(&mut self, session: &mut Session) -> Option<String> {
        let command = self.undo_stack.pop()?;
        if let Err(err) = command.invert(session) {
            // Cannot happen for commands this history performed; keep the
            // stacks consistent anyway.
            log::error!("undo {} failed: {err}", command.label());
            self.undo_stack.push(command);
            return None;
        }
        let label = command.label();
        log::debug!("undo {label}");
        self.redo_stack.push(command);
        self.notify(HistoryEventKind::Undone, label.clone());
        Some(label)
    }

    /// Redo the most recently undone command. `None` when redo is empty.
    pub fn redo(&mut self, session: &mut Session) -> Option<String> {
        let command = self.redo_stack.pop()?;
        if let Err(err) = command.perform(session) {
            log::error!("redo {} failed: {err}", command.label());
            self.redo_stack.push(command);
            return None;
        }
        let label = command.label();
        log::debug!("redo {label}");
        self.undo_stack.push(command);
        self.notify(HistoryEventKind::Redone, label.clone());
        Some(label)
    }

    /// Walk to absolute timeline position `n` (0 = everything undone,
    /// `len()` = everything applied) by repeated undo/redo — never by
    /// jumping, so every intermediate state is one a real perform or
    /// invert produced. Out-of-range positions are clamped.
    pub fn go_to(&mut self, session: &mut Session, n: usize) {
        let n = n.min(self.len());
        while self.position() > n {
            if self.undo(session).is_none() {
                break;
            }
        }
        while self.position() < n {
            if self.redo(session).is_none() {
                break;
            }
        }
    }

    /// Forget all history without touching the document.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify(HistoryEventKind::Cleared, String::new());
    }

    // ─── Listeners ───────────────────────────────────────────────────────

    /// Register a listener invoked after every state-changing call, in
    /// registration order.
    pub fn on_change(&mut self, listener: impl FnMut(&HistoryEvent) + 'static) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn off_change(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn notify(&mut self, kind: HistoryEventKind, label: String) {
        let event = HistoryEvent {
            kind,
            label,
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
        };
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }

    // ─── Diagnostics ─────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Current absolute timeline position (= number of applied commands).
    pub fn position(&self) -> usize {
        self.undo_stack.len()
    }

    /// Total reachable timeline length (applied + undone).
    pub fn len(&self) -> usize {
        self.undo_stack.len() + self.redo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels of the most recently applied commands, newest first.
    pub fn recent_labels(&self, count: usize) -> Vec<String> {
        self.undo_stack
            .iter()
            .rev()
            .take(count)
            .map(Command::label)
            .collect()
    }

    pub fn memory_info(&self) -> MemoryInfo {
        let estimated_bytes = self
            .undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(Command::estimated_bytes)
            .sum();
        MemoryInfo {
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
            max_entries: self.max_entries,
            estimated_bytes,
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}
