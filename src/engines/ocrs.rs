//! OCRS engine implementation
//!
//! Pure Rust OCR engine using the ocrs library. No system dependencies required.
//! Downloads neural network models automatically on first use.

use super::models;
use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult, Progress};
use crate::error::OcrError;
use crate::recognition::{confidence::estimate_confidence, RecognitionParams};
use image::DynamicImage;
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;
use std::path::Path;

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";

/// Lines recognized per batch between progress reports
const LINES_PER_BATCH: usize = 8;

/// OCR Engine wrapping the ocrs library
pub struct OcrsEngine {
    /// Unconstrained alphabet
    engine: OcrsOcrEngine,
    /// Restricted to the digit allowlist
    digits_engine: OcrsOcrEngine,
}

impl OcrsEngine {
    /// Create a new OCR engine, downloading models if needed
    pub fn new(_config: &Config) -> Result<Self, OcrError> {
        tracing::info!("Initializing ocrs OCR engine...");

        let cache = models::cache_dir()?;
        let detection_model_path =
            models::ensure_downloaded(DETECTION_MODEL_URL, &cache, "text-detection.rten")?;
        let recognition_model_path =
            models::ensure_downloaded(RECOGNITION_MODEL_URL, &cache, "text-recognition.rten")?;

        let engine = build_engine(&detection_model_path, &recognition_model_path, None)?;
        let digits_engine = build_engine(
            &detection_model_path,
            &recognition_model_path,
            Some(crate::recognition::DIGIT_ONLY_ALLOWLIST),
        )?;

        tracing::info!("ocrs engine initialized successfully");

        Ok(Self {
            engine,
            digits_engine,
        })
    }
}

fn build_engine(
    detection_model_path: &Path,
    recognition_model_path: &Path,
    allowed_chars: Option<&str>,
) -> Result<OcrsOcrEngine, OcrError> {
    let detection_model = Model::load_file(detection_model_path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to load detection model: {}", e))
    })?;
    let recognition_model = Model::load_file(recognition_model_path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to load recognition model: {}", e))
    })?;

    OcrsOcrEngine::new(OcrEngineParams {
        detection_model: Some(detection_model),
        recognition_model: Some(recognition_model),
        decode_method: DecodeMethod::Greedy,
        allowed_chars: allowed_chars.map(str::to_string),
        ..Default::default()
    })
    .map_err(|e| OcrError::InitializationError(format!("Failed to create OCR engine: {}", e)))
}

fn failure<E: std::fmt::Display>(stage: &'static str) -> impl Fn(E) -> OcrError {
    move |e| OcrError::RecognitionFailure(format!("Failed to {}: {}", stage, e))
}

impl OcrEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Pure Rust OCR engine - fast, no system dependencies, Latin script only"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        params: &RecognitionParams,
        progress: &mut Progress<'_>,
    ) -> Result<OcrResult, OcrError> {
        let mut warnings = Vec::new();
        if params.wants_language("jpn") {
            tracing::warn!("Japanese requested but ocrs only reads Latin script");
            warnings.push("ocrs has no Japanese model; only Latin text was recognized".to_string());
        }

        let engine = if params.char_allowlist.is_some() {
            &self.digits_engine
        } else {
            &self.engine
        };

        // ocrs always runs its own layout analysis
        tracing::debug!(segmentation = ?params.segmentation, "ocrs ignores segmentation hint");

        // Convert to RGB8 (HWC format, which is what ImageSource::from_bytes expects)
        let rgb_img = image.to_rgb8();
        let dimensions = rgb_img.dimensions();

        let img_source = ImageSource::from_bytes(rgb_img.as_raw(), dimensions).map_err(|e| {
            OcrError::RecognitionFailure(format!("Failed to create image source: {}", e))
        })?;

        let ocr_input = engine
            .prepare_input(img_source)
            .map_err(failure("prepare input"))?;
        progress.report(10);

        let word_rects = engine
            .detect_words(&ocr_input)
            .map_err(failure("detect words"))?;
        progress.report(40);

        let line_rects = engine.find_text_lines(&ocr_input, &word_rects);
        progress.report(50);

        let mut lines = Vec::with_capacity(line_rects.len());
        for (batch_index, batch) in line_rects.chunks(LINES_PER_BATCH).enumerate() {
            let line_texts = engine
                .recognize_text(&ocr_input, batch)
                .map_err(failure("recognize text"))?;

            lines.extend(line_texts.iter().filter_map(|line| line.as_ref()).map(|line| {
                line.words()
                    .map(|word| word.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            }));

            let done = (batch_index * LINES_PER_BATCH + batch.len()).min(line_rects.len());
            progress.report_fraction(50, 100, done, line_rects.len());
        }

        let text = lines.join("\n");
        let confidence = estimate_confidence(&text);

        Ok(OcrResult {
            text,
            confidence,
            warnings,
        })
    }

    fn supported_languages(&self) -> Vec<String> {
        // ocrs currently only supports English/Latin alphabet
        vec!["eng".to_string()]
    }
}
