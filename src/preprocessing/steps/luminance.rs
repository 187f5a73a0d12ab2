use crate::error::OcrError;

/// Convert a row-major RGBA buffer to one luminance byte per pixel.
///
/// Uses the Rec. 601 weights `0.299 R + 0.587 G + 0.114 B`, rounded to the
/// nearest integer. Alpha is ignored.
pub fn extract_luminance(rgba: &[u8]) -> Result<Vec<u8>, OcrError> {
    if rgba.len() % 4 != 0 {
        return Err(OcrError::ShapeMismatch(format!(
            "RGBA buffer length {} is not a multiple of 4",
            rgba.len()
        )));
    }

    Ok(rgba
        .chunks_exact(4)
        .map(|px| {
            let (r, g, b) = (px[0] as f64, px[1] as f64, px[2] as f64);
            (0.299 * r + 0.587 * g + 0.114 * b).round() as u8
        })
        .collect())
}
