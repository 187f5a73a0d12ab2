//! Conversions between encoded image blobs and RGBA pixel surfaces.

use crate::error::OcrError;
use bytes::Bytes;
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, RgbaImage};

pub const PNG_MIME: &str = "image/png";

/// Image bytes as received or produced, tagged with their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data: Bytes,
    mime_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// The value handed from one preprocessing step to the next.
///
/// Steps that work on pixels return a `Surface`; it is only encoded again once
/// the whole pipeline has run.
#[derive(Debug, Clone)]
pub enum ImageRepr {
    Blob(EncodedImage),
    Surface(RgbaImage),
}

impl ImageRepr {
    pub fn into_surface(self) -> Result<RgbaImage, OcrError> {
        match self {
            ImageRepr::Blob(blob) => decode_surface(&blob),
            ImageRepr::Surface(surface) => Ok(surface),
        }
    }

    pub fn into_encoded(self) -> Result<EncodedImage, OcrError> {
        match self {
            ImageRepr::Blob(blob) => Ok(blob),
            ImageRepr::Surface(surface) => encode_png(&surface),
        }
    }
}

/// Decode any format the `image` crate understands into an RGBA8 surface
pub fn decode_surface(image: &EncodedImage) -> Result<RgbaImage, OcrError> {
    let decoded = image::load_from_memory(image.data())
        .map_err(|e| OcrError::DecodeFailure(format!("{} ({})", e, image.mime_type())))?;

    tracing::debug!(
        "Decoded {} image: {}x{}",
        image.mime_type(),
        decoded.width(),
        decoded.height()
    );

    Ok(decoded.into_rgba8())
}

/// Encode a surface as lossless PNG
pub fn encode_png(surface: &RgbaImage) -> Result<EncodedImage, OcrError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            surface.as_raw(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| OcrError::EncodingFailure(e.to_string()))?;

    if buffer.is_empty() {
        return Err(OcrError::EncodingFailure(
            "PNG encoder produced no data".to_string(),
        ));
    }

    Ok(EncodedImage::new(buffer, PNG_MIME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encode_then_decode_keeps_pixels() {
        let mut surface = RgbaImage::from_pixel(3, 2, Rgba([200, 10, 10, 255]));
        surface.put_pixel(2, 1, Rgba([0, 0, 0, 255]));

        let encoded = encode_png(&surface).unwrap();
        assert_eq!(encoded.mime_type(), PNG_MIME);

        let decoded = decode_surface(&encoded).unwrap();
        assert_eq!(decoded, surface);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let blob = EncodedImage::new(&b"not an image"[..], "image/png");
        let err = decode_surface(&blob).unwrap_err();
        assert!(matches!(err, OcrError::DecodeFailure(_)));
    }

    #[test]
    fn test_blob_passes_through_unencoded() {
        let blob = EncodedImage::new(&b"opaque"[..], "image/webp");
        let out = ImageRepr::Blob(blob.clone()).into_encoded().unwrap();
        assert_eq!(out, blob);
    }
}
