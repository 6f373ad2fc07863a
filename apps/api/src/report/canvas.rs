//! Canvas: the drawing capability consumed by the report assembler.
//!
//! Units are millimetres for positions and heights, points for font sizes.
//! Implementations own pagination inside a section (text wrapping and automatic
//! page breaks on overflow); callers only request explicit page breaks.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF encoding error: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub trait Canvas {
    /// Starts a new page. Font, color and margin settings carry over.
    fn new_page(&mut self);

    fn set_font(&mut self, style: FontStyle, size_pt: f32);

    fn set_text_color(&mut self, color: Rgb);

    /// Moves the left edge of the text area. Applies to the next line written.
    fn set_left_margin(&mut self, margin_mm: f32);

    /// Writes a single line of `height` and moves the cursor below it.
    fn write_cell(&mut self, height: f32, text: &str, align: Align);

    /// Writes `text` word-wrapped to the text area, one `line_height` per line.
    fn write_wrapped(&mut self, line_height: f32, text: &str, align: Align);

    /// Moves the cursor down by `height` without writing.
    fn line_break(&mut self, height: f32);

    fn page_count(&self) -> usize;

    /// Writes the finished document to `path`.
    fn persist(&mut self, path: &Path) -> Result<(), CanvasError>;
}
