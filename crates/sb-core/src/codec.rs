//! Persistence boundary.
//!
//! The core never performs I/O. A `Project` crosses to external storage as
//! an opaque value: compact MessagePack bytes for saves, JSON text for
//! export/debugging. Whoever holds the bytes owns the storage problem.

use crate::screen::Project;

/// Encode a project as MessagePack bytes.
pub fn to_bytes(project: &Project) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec(project)
}

/// Decode a project from MessagePack bytes.
pub fn from_bytes(bytes: &[u8]) -> Result<Project, rmp_serde::decode::Error> {
    rmp_serde::from_slice(bytes)
}

/// Encode a project as pretty-printed JSON.
pub fn to_json(project: &Project) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(project)
}

/// Decode a project from JSON text.
pub fn from_json(text: &str) -> Result<Project, serde_json::Error> {
    serde_json::from_str(text)
}
