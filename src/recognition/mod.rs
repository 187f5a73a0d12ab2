//! Character modes, engine parameters and text post-filtering around an
//! [`OcrEngine`](crate::engine::OcrEngine).

pub mod confidence;

use crate::engine::{OcrEngine, OcrResult, Progress};
use crate::error::OcrError;
use crate::preprocessing::EncodedImage;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters the engine may emit when only digits are requested
pub const DIGIT_ONLY_ALLOWLIST: &str = "0123456789.,:/-+%()[]{} ";

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("valid regex"));
static LATIN_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]").expect("valid regex"));
// Hiragana, Katakana, CJK ext. A, CJK unified, half-width Katakana
static JAPANESE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{3040}-\x{30FF}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}\x{FF66}-\x{FF9F}]")
        .expect("valid regex")
});

/// Which character classes the user wants back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterModes {
    pub japanese: bool,
    pub english: bool,
    pub digits: bool,
}

impl CharacterModes {
    pub const DEFAULT: Self = Self {
        japanese: true,
        english: true,
        digits: true,
    };

    pub fn any_enabled(&self) -> bool {
        self.japanese || self.english || self.digits
    }

    pub fn digits_only(&self) -> bool {
        self.digits && !self.japanese && !self.english
    }
}

impl Default for CharacterModes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Page layout analysis requested from the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSegmentation {
    /// Let the engine find blocks and columns itself
    Auto,
    /// Treat the whole image as one uniform block of text
    SingleBlock,
}

impl PageSegmentation {
    /// Value for Tesseract's `tessedit_pageseg_mode` variable
    pub fn tesseract_psm(&self) -> &'static str {
        match self {
            Self::Auto => "3",
            Self::SingleBlock => "6",
        }
    }
}

/// Everything an engine needs to know about one recognition request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognitionParams {
    /// Tesseract-style language string, e.g. `jpn+eng`
    pub language: String,
    pub segmentation: PageSegmentation,
    pub char_allowlist: Option<&'static str>,
}

impl RecognitionParams {
    pub fn for_modes(modes: CharacterModes) -> Result<Self, OcrError> {
        let language = resolve_language(modes).ok_or(OcrError::NoEnabledReadingMode)?;

        if modes.digits_only() {
            return Ok(Self {
                language,
                segmentation: PageSegmentation::SingleBlock,
                char_allowlist: Some(DIGIT_ONLY_ALLOWLIST),
            });
        }

        Ok(Self {
            language,
            segmentation: PageSegmentation::Auto,
            char_allowlist: None,
        })
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.language.split('+').filter(|lang| !lang.is_empty())
    }

    pub fn wants_language(&self, code: &str) -> bool {
        self.languages().any(|lang| lang == code)
    }
}

/// `jpn` for Japanese, `eng` for English or digits, joined with `+`.
/// `None` when every mode is off.
pub fn resolve_language(modes: CharacterModes) -> Option<String> {
    let mut langs = Vec::new();
    if modes.japanese {
        langs.push("jpn");
    }
    if modes.english || modes.digits {
        langs.push("eng");
    }

    if langs.is_empty() {
        None
    } else {
        Some(langs.join("+"))
    }
}

/// Strip character classes the user turned off, then trim
pub fn filter_by_modes(text: &str, modes: CharacterModes) -> String {
    let mut result = text.to_string();

    if !modes.digits {
        result = DIGITS.replace_all(&result, "").into_owned();
    }
    if !modes.english {
        result = LATIN_LETTERS.replace_all(&result, "").into_owned();
    }
    if !modes.japanese {
        result = JAPANESE.replace_all(&result, "").into_owned();
    }

    result.trim().to_string()
}

/// Run `engine` over an encoded image and filter its text by `modes`.
///
/// Rejects with `NoEnabledReadingMode` before touching the image when every
/// mode is off. `on_progress` sees non-decreasing values ending at 100 on
/// success.
pub fn recognize_image(
    engine: &dyn OcrEngine,
    image: &EncodedImage,
    modes: CharacterModes,
    on_progress: &mut dyn FnMut(u8),
) -> Result<OcrResult, OcrError> {
    let params = RecognitionParams::for_modes(modes)?;

    let decoded = image::load_from_memory(image.data()).map_err(|e| {
        OcrError::RecognitionFailure(format!("Failed to load {}: {}", image.mime_type(), e))
    })?;

    tracing::debug!(
        engine = engine.name(),
        language = %params.language,
        segmentation = ?params.segmentation,
        "Starting recognition"
    );

    let mut progress = Progress::new(on_progress);
    progress.report(0);
    let result = engine.recognize(&decoded, &params, &mut progress)?;
    progress.report(100);

    Ok(OcrResult {
        text: filter_by_modes(&result.text, modes),
        ..result
    })
}
