//! Node Palette Library
//!
//! Toolkit-independent core of a node editor front end: the categorized node
//! catalog with its drag payloads, and the per-node form state that is
//! snapshotted into saved graphs.

pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod persistence;

pub use catalog::{CatalogTree, CategoryNode, DragPayload, ItemDescriptor, ItemRegistry};
pub use config::PaletteConfig;
pub use error::{CatalogError, ConfigError, FormError, PersistenceError};
pub use form::{FieldSpec, FieldValue, FormState, RestoreReport};
