use crate::error::OcrError;
use crate::recognition::RecognitionParams;
use image::DynamicImage;

/// OCR processing result
#[derive(Debug, Clone)]
pub struct OcrResult {
    pub text: String,
    pub confidence: f32,
    pub warnings: Vec<String>,
}

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize text in a decoded image.
    ///
    /// Implementations honor the language, segmentation and allowlist in
    /// `params` as far as the backend allows, and report progress through
    /// `progress`. Failures are reported as `OcrError::RecognitionFailure`.
    fn recognize(
        &self,
        image: &DynamicImage,
        params: &RecognitionParams,
        progress: &mut Progress<'_>,
    ) -> Result<OcrResult, OcrError>;

    /// Get supported languages (Tesseract codes, e.g. "eng", "jpn")
    fn supported_languages(&self) -> Vec<String>;
}

/// Forwards recognition progress to a caller callback.
///
/// Values are clamped to 0..=100 and only forwarded when they move forward,
/// so callers always see a non-decreasing sequence.
pub struct Progress<'a> {
    sink: &'a mut dyn FnMut(u8),
    last: Option<u8>,
}

impl<'a> Progress<'a> {
    pub fn new(sink: &'a mut dyn FnMut(u8)) -> Self {
        Self { sink, last: None }
    }

    pub fn report(&mut self, percent: u32) {
        let value = percent.min(100) as u8;
        if self.last.is_some_and(|last| value <= last) {
            return;
        }
        self.last = Some(value);
        (self.sink)(value);
    }

    /// Report `done` of `total` units of work, mapped into `start..=end`
    pub fn report_fraction(&mut self, start: u32, end: u32, done: usize, total: usize) {
        if total == 0 {
            self.report(end);
            return;
        }
        let span = end.saturating_sub(start) as usize;
        self.report(start + (span * done.min(total) / total) as u32);
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_clamped_and_monotonic() {
        let mut seen = Vec::new();
        {
            let mut sink = |p: u8| seen.push(p);
            let mut progress = Progress::new(&mut sink);
            progress.report(0);
            progress.report(30);
            progress.report(20);
            progress.report(30);
            progress.report(250);
        }
        assert_eq!(seen, vec![0, 30, 100]);
    }

    #[test]
    fn test_report_fraction_maps_into_range() {
        let mut seen = Vec::new();
        {
            let mut sink = |p: u8| seen.push(p);
            let mut progress = Progress::new(&mut sink);
            for done in 1..=4 {
                progress.report_fraction(50, 100, done, 4);
            }
        }
        assert_eq!(seen, vec![62, 75, 87, 100]);
    }
}
