//! Picking the image out of pasted clipboard data

use crate::error::OcrError;
use crate::preprocessing::EncodedImage;
use bytes::Bytes;

/// MIME types accepted from the clipboard
pub const SUPPORTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// One typed entry of pasted data
#[derive(Debug, Clone)]
pub struct PasteItem {
    pub mime_type: String,
    /// File payload, when the item carries one
    pub payload: Option<Bytes>,
}

impl PasteItem {
    pub fn new(mime_type: impl Into<String>, payload: Option<Bytes>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload,
        }
    }
}

/// Human-readable list of the accepted formats
pub fn supported_formats_label() -> String {
    SUPPORTED_IMAGE_TYPES
        .iter()
        .map(|mime| mime.trim_start_matches("image/").to_uppercase())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Return the first item with a supported type and a non-empty payload
pub fn select_pasted_image(items: &[PasteItem]) -> Result<EncodedImage, OcrError> {
    items
        .iter()
        .filter(|item| SUPPORTED_IMAGE_TYPES.contains(&item.mime_type.as_str()))
        .find_map(|item| match &item.payload {
            Some(payload) if !payload.is_empty() => {
                Some(EncodedImage::new(payload.clone(), item.mime_type.clone()))
            }
            _ => None,
        })
        .ok_or_else(|| {
            tracing::debug!(
                "No supported image among pasted types: {:?}",
                items.iter().map(|i| i.mime_type.as_str()).collect::<Vec<_>>()
            );
            OcrError::UnsupportedPasteData {
                supported: supported_formats_label(),
            }
        })
}
