//! Drop-position resolution: pointer geometry → structural destination.
//!
//! Runs on every pointer-move frame of a drag, so it is a pure function
//! over candidate metadata — no tree access, no allocation beyond the
//! returned target. The render layer annotates each candidate under the
//! pointer with its screen-space box and whether it accepts children;
//! `resolve_drop` turns that into "insert under parent P at index i".

use sb_core::{CanvasNode, ComponentCatalog, NodeId};
use std::collections::HashMap;

/// Axis-aligned screen-space bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    /// Vertical position of `py` inside this box as a 0..1 fraction.
    /// Degenerate heights count as the middle.
    fn vertical_fraction(&self, py: f32) -> f32 {
        if self.h > 0.0 {
            (py - self.y) / self.h
        } else {
            0.5
        }
    }
}

/// Where the dragged item lands relative to the hit node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRelation {
    /// Previous sibling of the hit node.
    Before,
    /// Next sibling of the hit node.
    After,
    /// Appended to the hit node's children.
    Inside,
}

/// Resolved destination for the current drag frame. Ephemeral: recomputed
/// per pointer move, discarded on cancel, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub parent: NodeId,
    pub index: usize,
    pub relation: DropRelation,
}

/// One currently-rendered node under consideration, annotated by the
/// render layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropCandidate {
    pub id: NodeId,
    /// `None` for the screen root.
    pub parent: Option<NodeId>,
    /// This node's index among its parent's children (0 for the root).
    pub index_in_parent: usize,
    pub child_count: usize,
    /// Nesting depth: 0 for the root. Deeper wins.
    pub depth: usize,
    pub bounds: Bounds,
    pub accepts_children: bool,
}

/// Top and bottom band heights as a fraction of the candidate's box.
/// Pointer in the top band inserts before, bottom band after, the middle
/// goes inside when the candidate is a container.
const EDGE_BAND: f32 = 0.25;

/// Map a pointer position over a set of candidates to a destination.
///
/// The deepest candidate containing the pointer wins; among equally deep
/// candidates the later (topmost in paint order) one wins. Returns `None`
/// when no candidate contains the pointer — the gesture is then simply
/// cancelled on release.
pub fn resolve_drop(px: f32, py: f32, candidates: &[DropCandidate]) -> Option<DropTarget> {
    let mut hit: Option<&DropCandidate> = None;
    for candidate in candidates {
        if candidate.bounds.contains(px, py)
            && hit.is_none_or(|best| candidate.depth >= best.depth)
        {
            hit = Some(candidate);
        }
    }
    let hit = hit?;

    let fraction = hit.bounds.vertical_fraction(py);
    let relation = if fraction < EDGE_BAND {
        DropRelation::Before
    } else if fraction > 1.0 - EDGE_BAND {
        DropRelation::After
    } else if hit.accepts_children {
        DropRelation::Inside
    } else if fraction < 0.5 {
        DropRelation::Before
    } else {
        DropRelation::After
    };

    let target = match (relation, hit.parent) {
        (DropRelation::Inside, _) => DropTarget {
            parent: hit.id,
            index: hit.child_count,
            relation,
        },
        (DropRelation::Before, Some(parent)) => DropTarget {
            parent,
            index: hit.index_in_parent,
            relation,
        },
        (DropRelation::After, Some(parent)) => DropTarget {
            parent,
            index: hit.index_in_parent + 1,
            relation,
        },
        // Root has no siblings: degrade edge bands to an append inside,
        // or to no target at all if the root somehow rejects children.
        (_, None) if hit.accepts_children => DropTarget {
            parent: hit.id,
            index: hit.child_count,
            relation: DropRelation::Inside,
        },
        (_, None) => return None,
    };

    log::trace!(
        "drop resolve ({px}, {py}) -> {:?} {} @ {}",
        target.relation,
        target.parent,
        target.index
    );
    Some(target)
}

/// Build the candidate list for a pointer position the way the render
/// layer would: a depth-first walk over the tree, keeping every node whose
/// known bounds contain the pointer. Children follow parents, so paint
/// order (later = topmost) is preserved for tie-breaking.
pub fn candidates_under_point(
    root: &CanvasNode,
    bounds: &HashMap<NodeId, Bounds>,
    catalog: &dyn ComponentCatalog,
    px: f32,
    py: f32,
) -> Vec<DropCandidate> {
    let mut out = Vec::new();
    collect(root, None, 0, 0, bounds, catalog, px, py, &mut out);
    out
}

#[allow(clippy::too_many_arguments)]
fn collect(
    node: &CanvasNode,
    parent: Option<NodeId>,
    index_in_parent: usize,
    depth: usize,
    bounds: &HashMap<NodeId, Bounds>,
    catalog: &dyn ComponentCatalog,
    px: f32,
    py: f32,
    out: &mut Vec<DropCandidate>,
) {
    if let Some(b) = bounds.get(&node.id)
        && b.contains(px, py)
    {
        out.push(DropCandidate {
            id: node.id,
            parent,
            index_in_parent,
            child_count: node.children.len(),
            depth,
            bounds: *b,
            accepts_children: catalog.is_container(node.tag),
        });
    }
    for (i, child) in node.children.iter().enumerate() {
        collect(
            child,
            Some(node.id),
            i,
            depth + 1,
            bounds,
            catalog,
            px,
            py,
            out,
        );
    }
}
