//! Drag payloads handed from the catalog to a drop target.
//!
//! A payload is created when a drag starts, consumed once by the drop target
//! and then discarded. It is never persisted, so the byte layout is simply the
//! `bincode` encoding of [`DragPayload`].

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use image::imageops::FilterType;
use image::ImageFormat;
use log::debug;
use serde::{Deserialize, Serialize};

use super::descriptor::{ItemDescriptor, KindId};
use crate::error::CatalogError;

/// MIME type under which encoded payloads travel.
pub const DRAG_MIME_TYPE: &str = "application/x-item";

/// Largest width or height of an embedded preview image.
pub const PREVIEW_MAX_DIMENSION: u32 = 256;

/// Data carried by a catalog drag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    /// Node type to instantiate on drop.
    pub kind_id: KindId,
    /// Name of the dragged entry.
    pub display_name: String,
    /// Subgraph file to load, only set for subgraph drags.
    pub associated_file: Option<String>,
    /// PNG-encoded preview, at most [`PREVIEW_MAX_DIMENSION`] on each side.
    pub preview_image: Option<Vec<u8>>,
}

impl DragPayload {
    /// Encodes the payload for the drag MIME data.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CatalogError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a payload received by a drop target.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CatalogError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Returns true if dropping this payload should load a subgraph file.
    pub fn is_subgraph(&self) -> bool {
        self.associated_file.is_some()
    }
}

/// Resolves an item's `icon_ref` to raw image bytes.
pub trait IconSource {
    /// Returns the icon bytes, or `None` if the icon is unavailable.
    fn load(&self, icon_ref: &str) -> Option<Vec<u8>>;
}

/// Icon source that never provides an icon.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIcons;

impl IconSource for NoIcons {
    fn load(&self, _icon_ref: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Reads icons from disk, resolving relative references against `root`.
#[derive(Clone, Debug)]
pub struct FsIconSource {
    root: PathBuf,
}

impl FsIconSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl IconSource for FsIconSource {
    fn load(&self, icon_ref: &str) -> Option<Vec<u8>> {
        if icon_ref.is_empty() {
            return None;
        }
        let path = self.root.join(icon_ref);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                debug!("Icon {} unavailable: {}", path.display(), err);
                None
            }
        }
    }
}

/// Builds the payload for dragging `item` out of the catalog.
///
/// `associated_file` is set only for subgraph drags. Icon problems never fail
/// the drag; they just leave `preview_image` empty.
pub fn encode_drag_payload(
    item: &ItemDescriptor,
    is_subgraph_drag: bool,
    subgraph_filename: Option<&str>,
    icons: &dyn IconSource,
) -> DragPayload {
    encode_bounded(item, is_subgraph_drag, subgraph_filename, icons, PREVIEW_MAX_DIMENSION)
}

pub(crate) fn encode_bounded(
    item: &ItemDescriptor,
    is_subgraph_drag: bool,
    subgraph_filename: Option<&str>,
    icons: &dyn IconSource,
    max_dimension: u32,
) -> DragPayload {
    let associated_file = if is_subgraph_drag {
        subgraph_filename.map(str::to_string)
    } else {
        None
    };
    let preview_image = icons
        .load(&item.icon_ref)
        .and_then(|bytes| bounded_preview(&bytes, max_dimension));

    DragPayload {
        kind_id: item.kind_id,
        display_name: item.name.clone(),
        associated_file,
        preview_image,
    }
}

/// Decodes an icon and shrinks it to fit `max_dimension`, keeping its aspect ratio.
///
/// Images already within bounds keep their size. Returns PNG bytes, or `None`
/// if the icon cannot be decoded or re-encoded.
pub fn bounded_preview(bytes: &[u8], max_dimension: u32) -> Option<Vec<u8>> {
    if max_dimension == 0 {
        return None;
    }
    let image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(err) => {
            debug!("Dropping unreadable icon: {}", err);
            return None;
        }
    };

    let image = if image.width() > max_dimension || image.height() > max_dimension {
        image.resize(max_dimension, max_dimension, FilterType::Triangle)
    } else {
        image
    };

    let mut encoded = Cursor::new(Vec::new());
    match image.write_to(&mut encoded, ImageFormat::Png) {
        Ok(()) => Some(encoded.into_inner()),
        Err(err) => {
            debug!("Cannot encode preview: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    /// Serves the same bytes for every icon reference.
    struct FixedIcon(Vec<u8>);

    impl IconSource for FixedIcon {
        fn load(&self, _icon_ref: &str) -> Option<Vec<u8>> {
            Some(self.0.clone())
        }
    }

    fn blur() -> ItemDescriptor {
        ItemDescriptor::new("Blur", 3, "image/filters").with_icon("blur.png")
    }

    #[test]
    fn test_payload_without_icon() {
        let payload = encode_drag_payload(&blur(), false, None, &NoIcons);
        assert_eq!(payload.kind_id, 3);
        assert_eq!(payload.display_name, "Blur");
        assert!(payload.associated_file.is_none());
        assert!(payload.preview_image.is_none());
        assert!(!payload.is_subgraph());
    }

    #[test]
    fn test_file_only_for_subgraph_drags() {
        let payload = encode_drag_payload(&blur(), false, Some("ignored.json"), &NoIcons);
        assert!(payload.associated_file.is_none());

        let item = ItemDescriptor::new("upscale.json", 0, "Subgraphs");
        let payload = encode_drag_payload(&item, true, Some("upscale.json"), &NoIcons);
        assert_eq!(payload.associated_file.as_deref(), Some("upscale.json"));
        assert!(payload.is_subgraph());
    }

    #[test]
    fn test_large_preview_is_bounded() {
        let icons = FixedIcon(png_bytes(512, 256));
        let payload = encode_drag_payload(&blur(), false, None, &icons);

        let preview = payload.preview_image.expect("preview should be embedded");
        let decoded = image::load_from_memory(&preview).unwrap();
        assert_eq!(decoded.dimensions(), (256, 128));
    }

    #[test]
    fn test_small_preview_keeps_size() {
        let preview = bounded_preview(&png_bytes(32, 48), PREVIEW_MAX_DIMENSION).unwrap();
        let decoded = image::load_from_memory(&preview).unwrap();
        assert_eq!(decoded.dimensions(), (32, 48));
    }

    #[test]
    fn test_malformed_icon_degrades() {
        let icons = FixedIcon(b"not an image".to_vec());
        let payload = encode_drag_payload(&blur(), false, None, &icons);
        assert!(payload.preview_image.is_none());
        assert_eq!(payload.kind_id, 3);
    }

    #[test]
    fn test_fs_icon_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blur.png"), png_bytes(16, 16)).unwrap();
        let icons = FsIconSource::new(dir.path());

        assert!(icons.load("blur.png").is_some());
        assert!(icons.load("missing.png").is_none());
        assert!(icons.load("").is_none());

        let payload = encode_drag_payload(&blur(), false, None, &icons);
        assert!(payload.preview_image.is_some());
    }

    #[test]
    fn test_bytes_decode_to_same_payload() {
        let payload = DragPayload {
            kind_id: 7,
            display_name: "upscale.json".to_string(),
            associated_file: Some("upscale.json".to_string()),
            preview_image: Some(vec![1, 2, 3]),
        };
        let bytes = payload.to_bytes().unwrap();
        assert_eq!(DragPayload::from_bytes(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_truncated_bytes_fail() {
        let payload = encode_drag_payload(&blur(), false, None, &NoIcons);
        let bytes = payload.to_bytes().unwrap();
        assert!(matches!(
            DragPayload::from_bytes(&bytes[..bytes.len() / 2]),
            Err(CatalogError::Payload(_))
        ));
    }
}
