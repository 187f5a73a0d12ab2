use super::threshold::FOREGROUND;
use crate::error::OcrError;

/// Mark pixels that belong to long horizontal or vertical foreground runs.
///
/// A run is a maximal stretch of [`FOREGROUND`] samples along a row or
/// column. Rows are checked against `min_horizontal`, columns against
/// `min_vertical`; qualifying runs are marked 1 along their whole length and
/// the two passes are OR'ed together. The mask must hold exactly
/// `width * height` samples.
pub fn detect_long_line_mask(
    binary: &[u8],
    width: usize,
    height: usize,
    min_horizontal: usize,
    min_vertical: usize,
) -> Result<Vec<u8>, OcrError> {
    let expected = width.checked_mul(height);
    if expected != Some(binary.len()) {
        return Err(OcrError::ShapeMismatch(format!(
            "binary mask has {} samples but image is {}x{}",
            binary.len(),
            width,
            height
        )));
    }

    let mut line_mask = vec![0u8; binary.len()];
    mark_runs(binary, &mut line_mask, height, width, min_horizontal, |row, x| {
        row * width + x
    });
    mark_runs(binary, &mut line_mask, width, height, min_vertical, |col, y| {
        y * width + col
    });
    Ok(line_mask)
}

/// Scan `lines` scanlines of `len` samples each; `index(line, pos)` maps to the
/// flat buffer offset.
fn mark_runs(
    binary: &[u8],
    line_mask: &mut [u8],
    lines: usize,
    len: usize,
    min_run: usize,
    index: impl Fn(usize, usize) -> usize,
) {
    for line in 0..lines {
        let mut pos = 0;
        while pos < len {
            if binary[index(line, pos)] != FOREGROUND {
                pos += 1;
                continue;
            }

            let start = pos;
            while pos < len && binary[index(line, pos)] == FOREGROUND {
                pos += 1;
            }

            if pos - start < min_run {
                continue;
            }

            for run_pos in start..pos {
                line_mask[index(line, run_pos)] = 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: usize, y: usize, width: usize) -> usize {
        y * width + x
    }

    #[test]
    fn test_marks_long_rows_and_columns_but_not_short_runs() {
        let (width, height) = (8, 8);
        let mut binary = vec![0u8; width * height];
        for x in 0..width {
            binary[at(x, 1, width)] = 1;
        }
        for y in 0..height {
            binary[at(6, y, width)] = 1;
        }
        for x in 1..=3 {
            binary[at(x, 6, width)] = 1;
        }

        let mask = detect_long_line_mask(&binary, width, height, 7, 7).unwrap();

        for x in 0..width {
            assert_eq!(mask[at(x, 1, width)], 1, "row 1, x={}", x);
        }
        for y in 0..height {
            assert_eq!(mask[at(6, y, width)], 1, "column 6, y={}", y);
        }
        for x in 1..=3 {
            assert_eq!(mask[at(x, 6, width)], 0, "short run at x={}", x);
        }
        let marked: usize = mask.iter().map(|&m| m as usize).sum();
        // 8 in row 1, 8 in column 6, one shared pixel
        assert_eq!(marked, 15);
    }

    #[test]
    fn test_rejects_wrong_mask_size() {
        let binary = vec![0u8; 10];
        let err = detect_long_line_mask(&binary, 4, 4, 2, 2).unwrap_err();
        assert!(matches!(err, OcrError::ShapeMismatch(_)));
    }

    #[test]
    fn test_rejects_mismatch_for_many_shapes() {
        for (w, h) in [(0, 3), (3, 0), (1, 1), (5, 7), (16, 2)] {
            let binary = vec![0u8; w * h + 1];
            assert!(detect_long_line_mask(&binary, w, h, 1, 1).is_err());
        }
    }

    #[test]
    fn test_output_shape_matches_input() {
        let binary = vec![1u8; 6 * 3];
        let mask = detect_long_line_mask(&binary, 6, 3, 10, 10).unwrap();
        assert_eq!(mask.len(), 18);
        assert!(mask.iter().all(|&m| m == 0));
    }

    #[test]
    fn test_separated_short_runs_never_merge() {
        // Three 2-pixel runs with gaps in a 10-wide row
        let binary = vec![1, 1, 0, 1, 1, 0, 1, 1, 0, 0];
        let mask = detect_long_line_mask(&binary, 10, 1, 3, 3).unwrap();
        assert!(mask.iter().all(|&m| m == 0));
    }

    #[test]
    fn test_run_touching_right_edge_is_marked() {
        let binary = vec![0, 0, 1, 1, 1, 1];
        let mask = detect_long_line_mask(&binary, 6, 1, 4, 100).unwrap();
        assert_eq!(mask, vec![0, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_empty_image() {
        let mask = detect_long_line_mask(&[], 0, 0, 1, 1).unwrap();
        assert!(mask.is_empty());
    }
}
