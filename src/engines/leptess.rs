//! Leptess/Tesseract engine implementation
//!
//! Tesseract-based OCR engine. Handles Japanese and supports page segmentation
//! modes and character whitelists. Uses tesseract-static crate for static
//! linking (no system dependencies). Downloads tessdata (training data)
//! automatically on first use.

use super::models;
use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult, Progress};
use crate::error::OcrError;
use crate::recognition::RecognitionParams;
use image::DynamicImage;
use std::path::PathBuf;
use tesseract_static::tesseract::Tesseract;

/// Languages fetched at startup, one per character mode family
const LANGUAGES: [&str; 2] = ["jpn", "eng"];

/// Tesseract OCR Engine
pub struct LeptessEngine {
    /// Path to tessdata directory
    tessdata_path: String,
}

impl LeptessEngine {
    /// Create a new Tesseract-based OCR engine
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let tessdata_dir = match &config.tessdata_path {
            Some(path) => PathBuf::from(path),
            None => models::cache_dir()?.join("tessdata"),
        };
        std::fs::create_dir_all(&tessdata_dir).map_err(|e| {
            OcrError::InitializationError(format!("Failed to create tessdata directory: {}", e))
        })?;

        for language in LANGUAGES {
            models::ensure_downloaded(
                &tessdata_url(language),
                &tessdata_dir,
                &format!("{}.traineddata", language),
            )?;
        }

        // Tesseract expects the directory, not the file
        let tessdata_path = tessdata_dir
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| OcrError::InitializationError("Invalid tessdata path".to_string()))?;

        // Validate that tessdata is accessible by doing a test initialization
        let test_tess = Tesseract::new(Some(&tessdata_path), Some(&LANGUAGES.join("+")))
            .map_err(|e| {
                OcrError::InitializationError(format!("Failed to initialize Tesseract: {}", e))
            })?;
        drop(test_tess);

        tracing::info!("Leptess engine initialized (tessdata: {})", tessdata_path);

        Ok(Self { tessdata_path })
    }
}

impl OcrEngine for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - Japanese and Latin, honors digit-only mode"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        params: &RecognitionParams,
        progress: &mut Progress<'_>,
    ) -> Result<OcrResult, OcrError> {
        // Convert to BMP in memory (BMP is always supported by leptonica)
        let rgb_img = image.to_rgb8();
        let (width, height) = rgb_img.dimensions();
        let mut bmp_data = Vec::new();
        rgb_img
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| {
                OcrError::RecognitionFailure(format!("Failed to convert to BMP: {}", e))
            })?;

        tracing::debug!(
            "Processing image: {}x{}, BMP size: {} bytes, language: {}",
            width,
            height,
            bmp_data.len(),
            params.language
        );

        let mut tess = Tesseract::new(Some(&self.tessdata_path), Some(&params.language))
            .map_err(|e| {
                OcrError::RecognitionFailure(format!("Failed to create Tesseract: {}", e))
            })?;

        tess = tess
            .set_variable("tessedit_pageseg_mode", params.segmentation.tesseract_psm())
            .map_err(|e| {
                OcrError::RecognitionFailure(format!("Failed to set segmentation mode: {}", e))
            })?;
        if let Some(allowlist) = params.char_allowlist {
            tess = tess
                .set_variable("tessedit_char_whitelist", allowlist)
                .map_err(|e| {
                    OcrError::RecognitionFailure(format!("Failed to set whitelist: {}", e))
                })?;
        }

        tess = tess.set_image_from_mem(&bmp_data).map_err(|e| {
            OcrError::RecognitionFailure(format!(
                "Failed to set image ({}x{}): {}",
                width, height, e
            ))
        })?;
        progress.report(10);

        tess = tess
            .recognize()
            .map_err(|e| OcrError::RecognitionFailure(format!("Failed to recognize text: {}", e)))?;
        progress.report(90);

        let text = tess
            .get_text()
            .map_err(|e| OcrError::RecognitionFailure(format!("Failed to get text: {}", e)))?;

        // Get confidence score (0-100 scale, convert to 0.0-1.0)
        let confidence = tess.mean_text_conf() as f32 / 100.0;

        Ok(OcrResult {
            text: text.trim().to_string(),
            confidence,
            warnings: Vec::new(),
        })
    }

    fn supported_languages(&self) -> Vec<String> {
        LANGUAGES.iter().map(|lang| lang.to_string()).collect()
    }
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    // Use tessdata_fast for smaller, faster downloads
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}
