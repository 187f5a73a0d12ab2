//! Image preprocessing module for OCR enhancement
//!
//! Cleans up pasted screenshots of tables before recognition: optional
//! background flattening and gridline removal, run as a fixed sequence of
//! steps over a blob-or-surface image.

pub mod codec;
pub mod options;
pub mod pipeline;
pub mod steps;

pub use codec::{EncodedImage, ImageRepr};
pub use options::{GridLineParams, PreprocessOptions};
pub use pipeline::{Pipeline, PreprocessingResult, StepId, StepTiming, PREPROCESS_STEPS};
