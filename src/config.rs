//! Palette configuration.
//!
//! Every field has a default, so a config file only needs the keys it changes.

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::catalog::{ItemDescriptor, KindId, PREVIEW_MAX_DIMENSION, SUBGRAPH_KIND_ID};
use crate::error::ConfigError;

/// Settings for catalog building and drag previews.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Folder scanned for saved subgraphs.
    pub subgraph_dir: PathBuf,
    /// Extension of subgraph files, without the dot.
    pub subgraph_extension: String,
    /// Label of the synthetic top-level subgraph category.
    pub subgraph_category: String,
    /// Tooltip of every subgraph entry.
    pub subgraph_tooltip: String,
    /// Icon reference of every subgraph entry.
    pub subgraph_icon: String,
    /// Kind id of the node that loads a subgraph.
    pub subgraph_kind_id: KindId,
    /// Folder that icon references are resolved against.
    pub icon_root: PathBuf,
    /// Largest width or height of drag previews.
    pub preview_max_dimension: u32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            subgraph_dir: PathBuf::from("subgraphs"),
            subgraph_extension: "json".to_string(),
            subgraph_category: "Subgraphs".to_string(),
            subgraph_tooltip: "Subgraph Nodes".to_string(),
            subgraph_icon: "icons/base_nodes/v2/load_subgraph.png".to_string(),
            subgraph_kind_id: SUBGRAPH_KIND_ID,
            icon_root: PathBuf::from("."),
            preview_max_dimension: PREVIEW_MAX_DIMENSION,
        }
    }
}

impl PaletteConfig {
    /// Loads the config from a JSON file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Catalog entry for one subgraph file.
    pub fn subgraph_descriptor(&self, file_name: &str) -> ItemDescriptor {
        ItemDescriptor::new(file_name, self.subgraph_kind_id, self.subgraph_category.clone())
            .with_icon(self.subgraph_icon.clone())
            .with_tooltip(self.subgraph_tooltip.clone())
    }

    /// Path of a subgraph file inside the subgraph folder.
    pub fn subgraph_path(&self, file_name: &str) -> PathBuf {
        self.subgraph_dir.join(file_name)
    }
}
