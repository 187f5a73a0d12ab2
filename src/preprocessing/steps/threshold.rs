/// Threshold used when the histogram has no valid two-class split
pub const FALLBACK_THRESHOLD: u8 = 128;

/// Mask value for dark (ink) pixels
pub const FOREGROUND: u8 = 1;
pub const BACKGROUND: u8 = 0;

/// Global threshold by Otsu's method.
///
/// Sweeps every candidate level and keeps the one with the largest
/// between-class variance `Wb * Wf * (mean_b - mean_f)^2`. On equal variance
/// the lowest level wins. Returns [`FALLBACK_THRESHOLD`] for empty input or
/// when every sample has the same value.
pub fn otsu_threshold(luminance: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &value in luminance {
        histogram[value as usize] += 1;
    }

    let total = luminance.len() as u64;
    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0.0f64;
    let mut max_variance = -1.0f64;
    let mut threshold = FALLBACK_THRESHOLD;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }

        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as f64 * count as f64;

        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight as f64;
        let variance = background_weight as f64
            * foreground_weight as f64
            * (background_mean - foreground_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            threshold = level as u8;
        }
    }

    threshold
}

/// Classify each sample: [`FOREGROUND`] when `luminance <= threshold`.
///
/// Dark-on-light polarity is assumed; light text on a dark background ends up
/// classified as background.
pub fn binary_mask(luminance: &[u8], threshold: u8) -> Vec<u8> {
    luminance
        .iter()
        .map(|&value| {
            if value <= threshold {
                FOREGROUND
            } else {
                BACKGROUND
            }
        })
        .collect()
}
