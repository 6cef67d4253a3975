//! Error types for the catalog, form state, persistence and configuration layers.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::KindId;
use crate::form::FieldFailure;

/// Errors raised while building or querying the node catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid category path '{path}' for item '{item}'")]
    InvalidCategoryPath { item: String, path: String },
    #[error("Item kind {0} is already registered")]
    DuplicateKind(KindId),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Drag payload error: {0}")]
    Payload(#[from] bincode::Error),
}

/// Errors raised by [`FormState`](crate::form::FormState).
///
/// `DuplicateField` is a programming error in a node definition and should
/// abort node construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Field '{0}' is already declared")]
    DuplicateField(String),
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("Field '{field}' expects a {expected} value")]
    TypeMismatch { field: String, expected: &'static str },
    #[error("'{value}' is not an option of field '{field}'")]
    InvalidChoice { field: String, value: String },
    #[error("{} field(s) failed to restore", .0.len())]
    Restore(Vec<FieldFailure>),
}

/// Errors raised while saving or loading graph documents.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Incompatible document version: found {found}, expected <= {expected}")]
    IncompatibleVersion { found: u32, expected: u32 },
    #[error("Invalid subgraph file name '{0}'")]
    InvalidSubgraphName(String),
}

/// Errors raised while loading a [`PaletteConfig`](crate::config::PaletteConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
