//! Graph documents for save/load.
//!
//! A document captures the nodes of a graph, each with the snapshot of its
//! form. Saved subgraphs use the same format.

use std::ffi::OsStr;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::KindId;
use crate::config::PaletteConfig;
use crate::error::PersistenceError;
use crate::form::{FormState, RestoreReport};

/// Current document format version.
/// Increment this when making breaking changes to the format.
pub const DOCUMENT_VERSION: u32 = 1;

/// A saved node graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Human-readable name for the graph.
    pub name: String,
    /// Format version of the file.
    pub version: u32,
    pub nodes: Vec<NodeRecord>,
}

impl GraphDocument {
    /// Create a new empty document with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: DOCUMENT_VERSION,
            nodes: Vec::new(),
        }
    }

    /// Check if this document version is readable by the current format.
    pub fn is_compatible(&self) -> bool {
        self.version <= DOCUMENT_VERSION
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: u64) -> Option<&NodeRecord> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

impl Default for GraphDocument {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Serialized data for a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique identifier within the document.
    pub id: u64,
    /// Node type, as listed in the catalog.
    pub kind_id: KindId,
    /// Title shown in the node header.
    pub title: String,
    /// Position in the editor (x, y).
    pub position: (f32, f32),
    /// Snapshot of the node's form.
    #[serde(default)]
    pub content: IndexMap<String, String>,
}

impl NodeRecord {
    /// Create a node record with empty content.
    pub fn new(id: u64, kind_id: KindId, title: impl Into<String>, position: (f32, f32)) -> Self {
        Self {
            id,
            kind_id,
            title: title.into(),
            position,
            content: IndexMap::new(),
        }
    }

    /// Builder method embedding the snapshot of `form`.
    pub fn with_form(mut self, form: &FormState) -> Self {
        self.content = form.snapshot();
        self
    }

    /// Restores `form` from the stored snapshot.
    pub fn restore_into(&self, form: &mut FormState) -> RestoreReport {
        form.restore(&self.content)
    }
}

/// Save a document to a JSON file.
pub fn save_to_file(document: &GraphDocument, path: &Path) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a document from a JSON file.
pub fn load_from_file(path: &Path) -> Result<GraphDocument, PersistenceError> {
    let json = std::fs::read_to_string(path)?;
    let document: GraphDocument = serde_json::from_str(&json)?;

    if !document.is_compatible() {
        return Err(PersistenceError::IncompatibleVersion {
            found: document.version,
            expected: DOCUMENT_VERSION,
        });
    }

    Ok(document)
}

/// Load the subgraph file named in a drag payload.
///
/// Only bare file names inside the subgraph folder are accepted.
pub fn load_subgraph(config: &PaletteConfig, file_name: &str) -> Result<GraphDocument, PersistenceError> {
    if !is_bare_file_name(file_name) {
        return Err(PersistenceError::InvalidSubgraphName(file_name.to_string()));
    }
    load_from_file(&config.subgraph_path(file_name))
}

fn is_bare_file_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && Path::new(name).file_name() == Some(OsStr::new(name))
}
