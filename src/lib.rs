//! Local OCR service for pasted clipboard images.
//!
//! Pasted images go through an optional preprocessing pipeline (background
//! color removal, table gridline removal) and are then recognized by one of
//! the registered OCR engines.

pub mod clipboard;
pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod paste;
pub mod preprocessing;
pub mod recognition;
pub mod server;

pub use engine::{OcrEngine, OcrResult};
pub use error::OcrError;
