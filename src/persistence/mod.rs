//! Persistence module
//!
//! Graph document save/load using serde and JSON.

pub mod document;

pub use document::{
    load_from_file, load_subgraph, save_to_file, GraphDocument, NodeRecord, DOCUMENT_VERSION,
};
