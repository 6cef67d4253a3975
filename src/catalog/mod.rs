//! Catalog module
//!
//! The node palette: item descriptors, the registry they come from, the
//! category tree built from both, subgraph file discovery and drag payloads.

mod descriptor;
mod drag;
mod registry;
mod subgraphs;
mod tree;

pub use descriptor::{ItemDescriptor, KindId, CATEGORY_SEPARATOR};
pub use drag::{
    bounded_preview, encode_drag_payload, DragPayload, FsIconSource, IconSource, NoIcons,
    DRAG_MIME_TYPE, PREVIEW_MAX_DIMENSION,
};
pub use registry::ItemRegistry;
pub use subgraphs::scan_subgraphs;
pub use tree::{display_label, CatalogTree, CategoryNode};

/// Kind id of the "load subgraph" node used for subgraph entries by default.
pub const SUBGRAPH_KIND_ID: KindId = 0;
