use super::{luminance, threshold, whiten};
use crate::error::OcrError;
use crate::preprocessing::codec::ImageRepr;
use crate::preprocessing::options::GridLineParams;
use image::RgbaImage;

/// Flatten paper tint and cell shading to white, keeping only ink pixels
pub fn apply(image: ImageRepr, _params: &GridLineParams) -> Result<ImageRepr, OcrError> {
    let mut surface = image.into_surface()?;
    remove_background_color(&mut surface)?;
    Ok(ImageRepr::Surface(surface))
}

/// Whiten every pixel the Otsu split classifies as background.
///
/// Returns the number of pixels painted.
pub fn remove_background_color(surface: &mut RgbaImage) -> Result<usize, OcrError> {
    let lum = luminance::extract_luminance(surface.as_raw())?;
    let level = threshold::otsu_threshold(&lum);

    // invert: background pixels are the ones to paint
    let background: Vec<u8> = threshold::binary_mask(&lum, level)
        .into_iter()
        .map(|flag| (flag == threshold::BACKGROUND) as u8)
        .collect();

    let painted = whiten::whiten_masked_pixels(surface, &background)?;
    tracing::debug!(threshold = level, painted, "Removed background color");
    Ok(painted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_tinted_cells_become_white() {
        let shading = Rgba([200, 225, 250, 255]);
        let ink = Rgba([30, 30, 60, 255]);
        let mut surface = RgbaImage::from_pixel(10, 10, shading);
        for x in 2..8 {
            surface.put_pixel(x, 5, ink);
        }

        remove_background_color(&mut surface).unwrap();

        assert_eq!(surface.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(surface.get_pixel(9, 9), &Rgba([255, 255, 255, 255]));
        assert_eq!(surface.get_pixel(4, 5), &ink);
    }

    #[test]
    fn test_uniform_light_image_turns_white() {
        // No split: fallback threshold 128 puts light pixels in the background
        let mut surface = RgbaImage::from_pixel(4, 4, Rgba([230, 230, 200, 255]));
        let painted = remove_background_color(&mut surface).unwrap();
        assert_eq!(painted, 16);
    }
}
