//! Category tree for the node palette.
//!
//! Items are filed under their slash-delimited category paths, sorted by name
//! inside every node, and a synthetic subgraph category is appended at the top
//! level. The tree is rebuilt wholesale on every refresh.

use std::collections::BTreeMap;

use log::debug;

use super::descriptor::{ItemDescriptor, CATEGORY_SEPARATOR};
use super::drag::{encode_bounded, DragPayload, IconSource};
use super::registry::ItemRegistry;
use super::subgraphs::scan_subgraphs;
use crate::config::PaletteConfig;

/// One category in the tree.
///
/// A node may hold sub-categories, items, or both. Children are keyed and
/// ordered by their raw label; items are ordered by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryNode {
    /// Raw category segment (empty for the root).
    pub label: String,
    /// Sub-categories ordered by label.
    pub children: BTreeMap<String, CategoryNode>,
    /// Items filed directly under this category, ordered by name.
    pub items: Vec<ItemDescriptor>,
}

impl CategoryNode {
    /// Creates an empty category.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: BTreeMap::new(),
            items: Vec::new(),
        }
    }

    /// Label as presented to the user, see [`display_label`].
    pub fn display_label(&self) -> String {
        display_label(&self.label)
    }

    /// Returns the direct sub-category with the given raw label.
    pub fn child(&self, label: &str) -> Option<&CategoryNode> {
        self.children.get(label)
    }

    /// Looks up a descendant by slash-delimited path of raw labels.
    pub fn find(&self, path: &str) -> Option<&CategoryNode> {
        path.split(CATEGORY_SEPARATOR)
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Returns the item with the given name filed directly under this node.
    pub fn item(&self, name: &str) -> Option<&ItemDescriptor> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Total number of items in this node and all of its descendants.
    pub fn item_count(&self) -> usize {
        self.items.len()
            + self
                .children
                .values()
                .map(CategoryNode::item_count)
                .sum::<usize>()
    }

    /// Returns true if this node has no sub-categories.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Visits every descendant depth-first, in display order.
    ///
    /// Direct children are visited at depth 0.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(usize, &'a CategoryNode)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(usize, &'a CategoryNode)) {
        for child in self.children.values() {
            visit(depth, child);
            child.walk_at(depth + 1, visit);
        }
    }

    /// Finds the first item named `name`, depth-first, returning its
    /// category path and descriptor.
    pub fn locate(&self, name: &str) -> Option<(String, &ItemDescriptor)> {
        for (label, child) in &self.children {
            if let Some(item) = child.item(name) {
                return Some((label.clone(), item));
            }
            if let Some((path, item)) = child.locate(name) {
                return Some((format!("{label}{CATEGORY_SEPARATOR}{path}"), item));
            }
        }
        None
    }

    fn child_or_insert(&mut self, label: &str) -> &mut CategoryNode {
        self.children
            .entry(label.to_string())
            .or_insert_with(|| CategoryNode::new(label))
    }

    fn sort_recursive(&mut self) {
        self.items
            .sort_by(|a, b| a.name.cmp(&b.name).then(a.kind_id.cmp(&b.kind_id)));
        for child in self.children.values_mut() {
            child.sort_recursive();
        }
    }
}

/// Presentation form of a category segment: first character upper-cased,
/// the rest unchanged.
pub fn display_label(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The node palette: a category tree plus the settings it was built with.
#[derive(Clone, Debug)]
pub struct CatalogTree {
    root: CategoryNode,
    subgraph_category: String,
    preview_max_dimension: u32,
}

impl CatalogTree {
    /// Builds the tree from the registry and a list of subgraph file names.
    ///
    /// The subgraph category is always present, even with no files. Registry
    /// items filed under it are merged with the subgraph entries.
    pub fn build(
        registry: &ItemRegistry,
        subgraph_files: &[String],
        config: &PaletteConfig,
    ) -> Self {
        let mut root = CategoryNode::new("");

        for descriptor in registry.descriptors() {
            let node = descriptor
                .category_path
                .split(CATEGORY_SEPARATOR)
                .fold(&mut root, |node, segment| node.child_or_insert(segment));
            node.items.push(descriptor.clone());
        }

        let subgraphs = root.child_or_insert(&config.subgraph_category);
        subgraphs.items.extend(
            subgraph_files
                .iter()
                .map(|file| config.subgraph_descriptor(file)),
        );

        root.sort_recursive();
        debug!(
            "Built catalog: {} categories, {} items ({} subgraphs)",
            root.children.len(),
            root.item_count(),
            subgraph_files.len()
        );

        Self {
            root,
            subgraph_category: config.subgraph_category.clone(),
            preview_max_dimension: config.preview_max_dimension,
        }
    }

    /// Rescans the subgraph folder and rebuilds the tree.
    pub fn refresh(registry: &ItemRegistry, config: &PaletteConfig) -> Self {
        let files = scan_subgraphs(&config.subgraph_dir, &config.subgraph_extension);
        Self::build(registry, &files, config)
    }

    /// Root of the tree. Its children are the top-level categories.
    pub fn root(&self) -> &CategoryNode {
        &self.root
    }

    /// Consumes the catalog, returning the root node.
    pub fn into_root(self) -> CategoryNode {
        self.root
    }

    /// The synthetic subgraph category.
    pub fn subgraphs(&self) -> Option<&CategoryNode> {
        self.root.child(&self.subgraph_category)
    }

    /// Builds the drag payload for the item `item_name` under `category_path`.
    ///
    /// Items whose parent category is the subgraph category carry their file
    /// name as the associated file. Returns `None` if the item does not exist.
    pub fn drag_payload_for(
        &self,
        category_path: &str,
        item_name: &str,
        icons: &dyn IconSource,
    ) -> Option<DragPayload> {
        let parent = self.root.find(category_path)?;
        let item = parent.item(item_name)?;
        let is_subgraph = parent
            .label
            .eq_ignore_ascii_case(&self.subgraph_category);
        let filename = is_subgraph.then_some(item.name.as_str());
        Some(encode_bounded(
            item,
            is_subgraph,
            filename,
            icons,
            self.preview_max_dimension,
        ))
    }
}
