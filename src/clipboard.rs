//! Writing recognized text back to the host clipboard

use crate::error::OcrError;

/// Destination for copied text
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), OcrError>;
}

/// Reject blank text before it reaches any clipboard
pub fn copy_text(clipboard: &dyn ClipboardWriter, text: &str) -> Result<(), OcrError> {
    if text.trim().is_empty() {
        return Err(OcrError::NothingToCopy);
    }
    clipboard.write_text(text)
}

/// The host clipboard via `arboard`, opened per write
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), OcrError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| OcrError::ClipboardUnavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| OcrError::ClipboardUnavailable(e.to_string()))?;

        tracing::info!("Copied {} characters to clipboard", text.chars().count());
        Ok(())
    }
}
