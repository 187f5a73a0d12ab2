//! Individual preprocessing steps and the pixel primitives they share

pub mod background;
pub mod grid_lines;
pub mod lines;
pub mod luminance;
pub mod threshold;
pub mod whiten;
