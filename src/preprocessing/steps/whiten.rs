use crate::error::OcrError;
use image::RgbaImage;

const OPAQUE_WHITE: [u8; 4] = [255, 255, 255, 255];

/// Paint every pixel whose mask sample is 1 opaque white.
///
/// Returns how many pixels were painted.
pub fn whiten_masked_pixels(surface: &mut RgbaImage, mask: &[u8]) -> Result<usize, OcrError> {
    let pixel_count = surface.width() as usize * surface.height() as usize;
    if mask.len() != pixel_count {
        return Err(OcrError::ShapeMismatch(format!(
            "mask has {} samples but surface is {}x{}",
            mask.len(),
            surface.width(),
            surface.height()
        )));
    }

    let mut painted = 0;
    for (pixel, &flag) in surface.chunks_exact_mut(4).zip(mask) {
        if flag == 1 {
            pixel.copy_from_slice(&OPAQUE_WHITE);
            painted += 1;
        }
    }
    Ok(painted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_only_masked_pixels_change() {
        let mut surface = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 40]));
        let painted = whiten_masked_pixels(&mut surface, &[0, 1, 1, 0]).unwrap();

        assert_eq!(painted, 2);
        assert_eq!(surface.get_pixel(0, 0), &Rgba([10, 20, 30, 40]));
        assert_eq!(surface.get_pixel(1, 0), &Rgba(OPAQUE_WHITE));
        assert_eq!(surface.get_pixel(0, 1), &Rgba(OPAQUE_WHITE));
        assert_eq!(surface.get_pixel(1, 1), &Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn test_rejects_short_mask() {
        let mut surface = RgbaImage::new(3, 3);
        let err = whiten_masked_pixels(&mut surface, &[1; 8]).unwrap_err();
        assert!(matches!(err, OcrError::ShapeMismatch(_)));
    }
}
