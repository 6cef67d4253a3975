//! Item registry for the node catalog.
//!
//! The registry is the explicit list of node types the catalog is built from.
//! It is constructed once by the application and passed to
//! [`CatalogTree::build`](super::CatalogTree::build), instead of living in a
//! module-level table.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;

use super::descriptor::{ItemDescriptor, KindId};
use crate::error::CatalogError;

/// Central registry of available node types, keyed by kind id.
///
/// # Example
///
/// ```
/// use node_palette::catalog::{ItemDescriptor, ItemRegistry};
///
/// let mut registry = ItemRegistry::new();
/// registry.register(ItemDescriptor::new("Blur", 3, "image/filters")).unwrap();
/// assert!(registry.contains(3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ItemRegistry {
    /// Descriptors ordered by kind id.
    items: BTreeMap<KindId, ItemDescriptor>,
}

impl ItemRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Registers a node type.
    ///
    /// Fails if the kind id is already taken or the category path has empty
    /// segments. The registry is unchanged on failure.
    pub fn register(&mut self, descriptor: ItemDescriptor) -> Result<(), CatalogError> {
        descriptor.category_segments()?;
        if self.items.contains_key(&descriptor.kind_id) {
            return Err(CatalogError::DuplicateKind(descriptor.kind_id));
        }
        self.items.insert(descriptor.kind_id, descriptor);
        Ok(())
    }

    /// Returns the descriptor registered under `kind_id`.
    pub fn get(&self, kind_id: KindId) -> Option<&ItemDescriptor> {
        self.items.get(&kind_id)
    }

    /// Iterates over all descriptors in ascending kind id order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ItemDescriptor> {
        self.items.values()
    }

    /// Returns the number of registered node types.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no node types are registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks if a node type with the given kind id is registered.
    pub fn contains(&self, kind_id: KindId) -> bool {
        self.items.contains_key(&kind_id)
    }

    /// Builds a registry from a JSON array of descriptors.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let descriptors: Vec<ItemDescriptor> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Loads a registry from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_json_str(&json)?;
        debug!("Loaded {} node types from {}", registry.len(), path.display());
        Ok(registry)
    }
}
