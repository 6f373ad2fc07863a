//! In-memory canvas that records every call, for asserting on assembled reports.

use std::path::{Path, PathBuf};

use crate::report::canvas::{Align, Canvas, CanvasError, FontStyle, Rgb};

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    NewPage,
    SetFont(FontStyle, f32),
    SetTextColor(Rgb),
    SetLeftMargin(f32),
    Cell(String, Align),
    Wrapped(String, Align),
    LineBreak(f32),
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<CanvasOp>,
    pub persisted: Vec<PathBuf>,
    pub fail_persist: bool,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_persist: true,
            ..Self::default()
        }
    }

    /// Text written on each page, in order. Index 0 is the first page.
    pub fn pages(&self) -> Vec<Vec<String>> {
        let mut pages: Vec<Vec<String>> = Vec::new();
        for op in &self.ops {
            match op {
                CanvasOp::NewPage => pages.push(Vec::new()),
                CanvasOp::Cell(text, _) | CanvasOp::Wrapped(text, _) => {
                    if let Some(page) = pages.last_mut() {
                        page.push(text.clone());
                    }
                }
                _ => {}
            }
        }
        pages
    }
}

impl Canvas for RecordingCanvas {
    fn new_page(&mut self) {
        self.ops.push(CanvasOp::NewPage);
    }

    fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.ops.push(CanvasOp::SetFont(style, size_pt));
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.ops.push(CanvasOp::SetTextColor(color));
    }

    fn set_left_margin(&mut self, margin_mm: f32) {
        self.ops.push(CanvasOp::SetLeftMargin(margin_mm));
    }

    fn write_cell(&mut self, _height: f32, text: &str, align: Align) {
        self.ops.push(CanvasOp::Cell(text.to_string(), align));
    }

    fn write_wrapped(&mut self, _line_height: f32, text: &str, align: Align) {
        self.ops.push(CanvasOp::Wrapped(text.to_string(), align));
    }

    fn line_break(&mut self, height: f32) {
        self.ops.push(CanvasOp::LineBreak(height));
    }

    fn page_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::NewPage))
            .count()
    }

    fn persist(&mut self, path: &Path) -> Result<(), CanvasError> {
        if self.fail_persist {
            return Err(CanvasError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only volume",
            )));
        }
        self.persisted.push(path.to_path_buf());
        Ok(())
    }
}
