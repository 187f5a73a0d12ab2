use serde::{Deserialize, Serialize};

/// Which optional cleanup steps run before recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessOptions {
    /// Flatten tinted paper and cell shading to white
    pub remove_background_color: bool,
    /// Erase long horizontal/vertical rules (table borders)
    pub remove_table_grid_lines: bool,
}

impl PreprocessOptions {
    pub const DEFAULT: Self = Self {
        remove_background_color: false,
        remove_table_grid_lines: true,
    };

    pub const NONE: Self = Self {
        remove_background_color: false,
        remove_table_grid_lines: false,
    };
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How long a dark run must be before it is treated as a gridline.
///
/// The resolved minimum for an axis is `max(min_run_px, floor(run_ratio * side))`,
/// so small images still need a run of at least `min_run_px` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLineParams {
    pub min_run_px: u32,
    pub run_ratio: f64,
}

impl GridLineParams {
    pub const DEFAULT: Self = Self {
        min_run_px: 24,
        run_ratio: 0.45,
    };

    /// Minimum run length for an axis whose length is `side` pixels
    pub fn min_run_length(&self, side: u32) -> usize {
        let proportional = (side as f64 * self.run_ratio).floor() as usize;
        proportional.max(self.min_run_px as usize)
    }
}

impl Default for GridLineParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
