use crate::error::OcrError;
use serde::Serialize;
use std::fmt;
use std::time::Instant;

use super::codec::{EncodedImage, ImageRepr};
use super::options::{GridLineParams, PreprocessOptions};
use super::steps;

/// Identifier recorded for each step that ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    RemoveBackgroundColor,
    RemoveTableGridLines,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoveBackgroundColor => "remove-background-color",
            Self::RemoveTableGridLines => "remove-table-grid-lines",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type StepFn = fn(ImageRepr, &GridLineParams) -> Result<ImageRepr, OcrError>;

/// One registered preprocessing step
pub struct PreprocessStep {
    pub id: StepId,
    pub is_enabled: fn(&PreprocessOptions) -> bool,
    pub apply: StepFn,
}

/// Steps in execution order. Background removal runs before gridline removal
/// so shaded header rows don't hide their borders from the line detector.
pub static PREPROCESS_STEPS: [PreprocessStep; 2] = [
    PreprocessStep {
        id: StepId::RemoveBackgroundColor,
        is_enabled: background_enabled,
        apply: steps::background::apply,
    },
    PreprocessStep {
        id: StepId::RemoveTableGridLines,
        is_enabled: grid_lines_enabled,
        apply: steps::grid_lines::apply,
    },
];

fn background_enabled(options: &PreprocessOptions) -> bool {
    options.remove_background_color
}

fn grid_lines_enabled(options: &PreprocessOptions) -> bool {
    options.remove_table_grid_lines
}

/// Timing information for a single preprocessing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: StepId,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessingResult {
    /// Final image (not serialized)
    #[serde(skip)]
    pub image: EncodedImage,
    /// Steps that ran, in order
    pub applied_steps: Vec<StepId>,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Preprocessing pipeline that applies the enabled steps
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: PreprocessOptions,
    grid_lines: GridLineParams,
}

impl Pipeline {
    pub fn new(options: PreprocessOptions) -> Self {
        Self {
            options,
            grid_lines: GridLineParams::DEFAULT,
        }
    }

    pub fn with_grid_lines(mut self, params: GridLineParams) -> Self {
        self.grid_lines = params;
        self
    }

    /// Run every enabled step over `image`.
    ///
    /// With no step enabled the source comes back untouched, without a
    /// decode/encode round trip.
    pub fn process(&self, image: EncodedImage) -> Result<PreprocessingResult, OcrError> {
        let start = Instant::now();
        let mut current = ImageRepr::Blob(image);
        let mut applied_steps = Vec::new();
        let mut steps_timing = Vec::new();

        for step in PREPROCESS_STEPS.iter() {
            if !(step.is_enabled)(&self.options) {
                continue;
            }

            current = self.run_step(step, current, &mut steps_timing)?;
            applied_steps.push(step.id);
        }

        let image = current.into_encoded()?;
        let total_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Preprocessing finished in {}ms, applied steps: {:?}",
            total_time_ms,
            applied_steps
        );

        Ok(PreprocessingResult {
            image,
            applied_steps,
            total_time_ms,
            steps: steps_timing,
        })
    }

    fn run_step(
        &self,
        step: &PreprocessStep,
        image: ImageRepr,
        timings: &mut Vec<StepTiming>,
    ) -> Result<ImageRepr, OcrError> {
        let step_start = Instant::now();
        let result = (step.apply)(image, &self.grid_lines)?;
        timings.push(StepTiming {
            name: step.id,
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::codec::{decode_surface, encode_png, PNG_MIME};
    use image::{Rgba, RgbaImage};

    fn table_png() -> EncodedImage {
        let mut surface = RgbaImage::from_pixel(50, 50, Rgba([245, 245, 245, 255]));
        for x in 0..50 {
            surface.put_pixel(x, 25, Rgba([0, 0, 0, 255]));
        }
        for y in 10..14 {
            surface.put_pixel(5, y, Rgba([0, 0, 0, 255]));
        }
        encode_png(&surface).unwrap()
    }

    #[test]
    fn test_no_enabled_steps_returns_source() {
        let source = EncodedImage::new(&b"not even decodable"[..], "image/jpeg");
        let result = Pipeline::new(PreprocessOptions::NONE)
            .process(source.clone())
            .unwrap();

        assert_eq!(result.image, source);
        assert!(result.applied_steps.is_empty());
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_grid_step_recorded_and_output_changes() {
        let source = table_png();
        let result = Pipeline::new(PreprocessOptions::DEFAULT)
            .process(source.clone())
            .unwrap();

        assert_eq!(result.applied_steps, vec![StepId::RemoveTableGridLines]);
        assert_eq!(result.image.mime_type(), PNG_MIME);
        assert_ne!(result.image, source);

        let out = decode_surface(&result.image).unwrap();
        assert_eq!(out.get_pixel(0, 25), &Rgba([255, 255, 255, 255]));
        assert_eq!(out.get_pixel(5, 11), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_steps_run_in_registration_order() {
        let options = PreprocessOptions {
            remove_background_color: true,
            remove_table_grid_lines: true,
        };
        let result = Pipeline::new(options).process(table_png()).unwrap();

        assert_eq!(
            result.applied_steps,
            vec![StepId::RemoveBackgroundColor, StepId::RemoveTableGridLines]
        );
        let names: Vec<StepId> = result.steps.iter().map(|t| t.name).collect();
        assert_eq!(names, result.applied_steps);
    }

    #[test]
    fn test_enabled_step_on_undecodable_source_fails() {
        let source = EncodedImage::new(&b"garbage"[..], "image/png");
        let err = Pipeline::new(PreprocessOptions::DEFAULT)
            .process(source)
            .unwrap_err();
        assert!(matches!(err, OcrError::DecodeFailure(_)));
    }

    #[test]
    fn test_step_ids_serialize_as_kebab_case() {
        let json = serde_json::to_string(&StepId::RemoveTableGridLines).unwrap();
        assert_eq!(json, "\"remove-table-grid-lines\"");
        assert_eq!(StepId::RemoveBackgroundColor.to_string(), "remove-background-color");
    }
}
