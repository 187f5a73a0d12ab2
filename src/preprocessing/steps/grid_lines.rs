use super::{lines, luminance, threshold, whiten};
use crate::error::OcrError;
use crate::preprocessing::codec::ImageRepr;
use crate::preprocessing::options::GridLineParams;
use image::RgbaImage;
use tracing::instrument;

/// Erase table borders so OCR doesn't read them as `1`, `|` or `-`
pub fn apply(image: ImageRepr, params: &GridLineParams) -> Result<ImageRepr, OcrError> {
    let mut surface = image.into_surface()?;
    remove_grid_lines(&mut surface, params)?;
    Ok(ImageRepr::Surface(surface))
}

/// Whiten long dark runs in place, returning the number of pixels erased
#[instrument(skip_all, fields(width = surface.width(), height = surface.height()))]
pub fn remove_grid_lines(surface: &mut RgbaImage, params: &GridLineParams) -> Result<usize, OcrError> {
    let (width, height) = surface.dimensions();

    let lum = luminance::extract_luminance(surface.as_raw())?;
    let level = threshold::otsu_threshold(&lum);
    let binary = threshold::binary_mask(&lum, level);

    let min_horizontal = params.min_run_length(width);
    let min_vertical = params.min_run_length(height);

    let line_mask = lines::detect_long_line_mask(
        &binary,
        width as usize,
        height as usize,
        min_horizontal,
        min_vertical,
    )?;
    let erased = whiten::whiten_masked_pixels(surface, &line_mask)?;

    tracing::debug!(
        threshold = level,
        min_horizontal,
        min_vertical,
        erased,
        "Removed table grid lines"
    );
    Ok(erased)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);
    const PAPER: Rgba<u8> = Rgba([250, 250, 250, 255]);

    #[test]
    fn test_removes_border_and_keeps_glyph() {
        let mut surface = RgbaImage::from_pixel(60, 60, PAPER);
        for x in 0..60 {
            surface.put_pixel(x, 10, INK);
        }
        for y in 0..60 {
            surface.put_pixel(30, y, INK);
        }
        // small glyph-like blob
        for y in 40..46 {
            for x in 5..8 {
                surface.put_pixel(x, y, INK);
            }
        }

        let erased = remove_grid_lines(&mut surface, &GridLineParams::DEFAULT).unwrap();

        assert_eq!(erased, 60 + 60 - 1);
        assert_eq!(surface.get_pixel(0, 10), &Rgba([255, 255, 255, 255]));
        assert_eq!(surface.get_pixel(30, 59), &Rgba([255, 255, 255, 255]));
        assert_eq!(surface.get_pixel(6, 42), &INK);
    }

    #[test]
    fn test_runs_shorter_than_floor_survive() {
        // 0.45 * 30 = 13, floor of 24 applies
        let mut surface = RgbaImage::from_pixel(30, 30, PAPER);
        for x in 0..20 {
            surface.put_pixel(x, 5, INK);
        }

        let erased = remove_grid_lines(&mut surface, &GridLineParams::DEFAULT).unwrap();
        assert_eq!(erased, 0);
        assert_eq!(surface.get_pixel(0, 5), &INK);
    }

    #[test]
    fn test_run_one_short_of_ratio_survives() {
        // floor(0.45 * 100) = 45
        let mut surface = RgbaImage::from_pixel(100, 100, PAPER);
        for x in 0..44 {
            surface.put_pixel(x, 50, INK);
        }

        let erased = remove_grid_lines(&mut surface, &GridLineParams::DEFAULT).unwrap();
        assert_eq!(erased, 0);
        assert_eq!(surface.get_pixel(43, 50), &INK);

        for x in 0..45 {
            surface.put_pixel(x, 50, INK);
        }
        let erased = remove_grid_lines(&mut surface, &GridLineParams::DEFAULT).unwrap();
        assert_eq!(erased, 45);
    }

    #[test]
    fn test_apply_decodes_blob() {
        let surface = RgbaImage::from_pixel(4, 4, PAPER);
        let blob = crate::preprocessing::codec::encode_png(&surface).unwrap();
        let out = apply(ImageRepr::Blob(blob), &GridLineParams::DEFAULT).unwrap();
        assert!(matches!(out, ImageRepr::Surface(s) if s == surface));
    }
}
