pub mod catalog;
pub mod codec;
pub mod id;
pub mod node;
pub mod screen;
pub mod tree;

pub use catalog::{ComponentCatalog, StaticCatalog};
pub use id::{ComponentTag, NodeId, ScreenId};
pub use node::{CanvasNode, PropMap};
pub use screen::{Project, SCREEN_ROOT_TAG, Screen};
pub use tree::{NodePath, Removed, TreeError};
