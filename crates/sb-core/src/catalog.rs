//! Component catalog interface.
//!
//! The palette of draggable component types lives outside this core; all
//! the tree needs to know about a type is whether it may own children.
//! Container-ness gates inserts, moves, and the resolver's inside-vs-
//! sibling decision.

use crate::id::ComponentTag;
use std::collections::HashSet;

/// Answers the one question the core asks about a component type.
pub trait ComponentCatalog {
    fn is_container(&self, tag: ComponentTag) -> bool;
}

/// Set-backed catalog: a type is a container iff it was registered as one.
/// External component libraries bring their own `ComponentCatalog` impl;
/// this one covers the built-in palette and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    containers: HashSet<ComponentTag>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in palette's container types registered.
    pub fn standard() -> Self {
        Self::with_containers(["screen", "container", "row", "column", "card", "form", "list"])
    }

    pub fn with_containers<'a>(tags: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            containers: tags.into_iter().map(ComponentTag::intern).collect(),
        }
    }

    /// Register an additional container type.
    pub fn register_container(&mut self, tag: ComponentTag) {
        self.containers.insert(tag);
    }
}

impl ComponentCatalog for StaticCatalog {
    fn is_container(&self, tag: ComponentTag) -> bool {
        self.containers.contains(&tag)
    }
}
