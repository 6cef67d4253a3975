//! Item descriptors: one entry per node type offered by the catalog.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Stable integer identifier of a node type.
pub type KindId = u32;

/// Separator between the segments of a category path.
pub const CATEGORY_SEPARATOR: char = '/';

/// Immutable description of a node type as shown in the catalog.
///
/// `category_path` is a slash-delimited hierarchy such as `"image/filters"`.
/// Empty segments (`"a//b"`, `""`, `"a/"`) are invalid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// Display name, also the sort key inside a category.
    pub name: String,
    /// Reference to the icon, resolved by an [`IconSource`](super::IconSource).
    #[serde(default)]
    pub icon_ref: String,
    /// Node type identifier handed to the drop target.
    pub kind_id: KindId,
    /// Help text shown on hover.
    #[serde(default)]
    pub tooltip: String,
    /// Slash-delimited category path.
    pub category_path: String,
}

impl ItemDescriptor {
    /// Creates a descriptor without icon or tooltip.
    pub fn new(name: impl Into<String>, kind_id: KindId, category_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon_ref: String::new(),
            kind_id,
            tooltip: String::new(),
            category_path: category_path.into(),
        }
    }

    /// Builder method to set the icon reference.
    pub fn with_icon(mut self, icon_ref: impl Into<String>) -> Self {
        self.icon_ref = icon_ref.into();
        self
    }

    /// Builder method to set the tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// Splits the category path into its segments.
    ///
    /// Fails with [`CatalogError::InvalidCategoryPath`] when any segment is empty.
    pub fn category_segments(&self) -> Result<Vec<&str>, CatalogError> {
        let segments: Vec<&str> = self.category_path.split(CATEGORY_SEPARATOR).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(CatalogError::InvalidCategoryPath {
                item: self.name.clone(),
                path: self.category_path.clone(),
            });
        }
        Ok(segments)
    }
}
